//! Core data model for mapping clinical terminology codes to ontology terms.
//!
//! This crate defines the ontology annotation dictionary and its flattening
//! logic, the evidence tags that record which matching strategy produced a
//! mapping, cross-reference string parsing, and the positional schema
//! descriptors for the UMLS thesaurus reference files.

pub mod columns;
mod dictionary;
mod error;
mod evidence;
mod schema;
mod xref;

pub use dictionary::{AnnotationType, FlattenedDictionary, OntologyDictionary, OntologyRecord};
pub use error::DictionaryError;
pub use evidence::Evidence;
pub use schema::{ConceptTableSchema, PositionalField, SemanticTypeSchema};
pub use xref::{ontology_acronym, vocabulary_prefix, xref_code};
