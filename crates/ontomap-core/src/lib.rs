//! Annotation pipeline orchestration.
//!
//! [`ConceptAnnotator`] sequences the four matching stages over a clinical
//! concept table, per granularity level (concept-level always, ancestor-
//! level when configured):
//!
//! 1. UMLS CUI and semantic-type enrichment (when thesaurus data is loaded)
//! 2. Ontology cross-reference matching
//! 3. Exact string matching against labels and synonyms
//! 4. Similarity matching for strings with no exact match
//!
//! Each run is a pure function of its inputs: the clinical table, the
//! ontology dictionary, and the thesaurus tables are never mutated after
//! construction.

mod annotator;
mod config;
mod error;

pub use annotator::{AnnotationOutcome, ConceptAnnotator};
pub use config::AnnotatorConfig;
pub use error::{PipelineError, Result};
