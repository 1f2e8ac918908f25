//! Error types for table reshaping.

use thiserror::Error;

/// Errors that can occur during reshape operations.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A named column is not present in the input frame.
    #[error("column '{column}' not found in table")]
    ColumnNotFound { column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for reshape operations.
pub type Result<T> = std::result::Result<T, TransformError>;
