//! Input loading for the annotation pipeline.
//!
//! This crate turns the three kinds of on-disk inputs into in-memory
//! tables:
//!
//! - **Clinical concept tables**: delimited text with a header row, comma
//!   or tab auto-detected, every cell loaded as a string.
//! - **UMLS thesaurus files**: pipe-delimited MRCONSO/MRSTY release files,
//!   read against explicit positional schemas.
//! - **Ontology dictionaries**: the serialized nested annotation mapping.
//!
//! All structural problems are detected here, before any join work runs.

mod clinical;
mod dictionary;
mod error;
mod thesaurus;

pub use clinical::read_clinical_table;
pub use dictionary::read_ontology_dictionary;
pub use error::{IngestError, Result};
pub use thesaurus::{read_concept_table, read_semantic_type_table};
