//! Error types for matching operations.

use ontomap_model::DictionaryError;
use thiserror::Error;

/// Errors that can occur while building or running a matcher.
#[derive(Debug, Error)]
pub enum MatchError {
    /// A column the matcher needs is not present in the input frame.
    #[error("column '{column}' not found in table")]
    MissingColumn { column: String },

    /// The ontology dictionary could not provide the needed annotations.
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    /// The dictionary carries neither label nor synonym annotations.
    #[error("ontology dictionary carries no label or synonym annotations")]
    NoStringAnnotations,

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for MatchError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for matching operations.
pub type Result<T> = std::result::Result<T, MatchError>;
