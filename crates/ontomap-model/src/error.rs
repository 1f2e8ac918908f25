//! Error types for the ontology dictionary.

use thiserror::Error;

use crate::dictionary::AnnotationType;

/// Errors raised while working with the ontology annotation dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The dictionary holds no ontologies at all.
    #[error("ontology dictionary is empty")]
    EmptyDictionary,

    /// No configured ontology carries any entry for the requested
    /// annotation type.
    #[error("no configured ontology carries '{annotation}' annotations")]
    AnnotationTypeMissing { annotation: AnnotationType },
}
