//! Error types for pipeline orchestration.

use ontomap_match::MatchError;
use ontomap_model::DictionaryError;
use ontomap_transform::TransformError;
use thiserror::Error;

/// Errors that can occur while constructing or running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Required input missing, empty, or of the wrong shape; detected
    /// before any join work runs.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl PipelineError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for PipelineError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
