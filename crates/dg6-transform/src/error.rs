use polars::error::PolarsError;
use thiserror::Error;

/// Errors raised while transforming a canonical table.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Scaling a column would produce a name that already exists.
    #[error("renaming column '{from}' to '{to}' would collide with an existing column")]
    RenameConflict { from: String, to: String },

    #[error("DataFrame error: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for TransformError {
    fn from(err: PolarsError) -> Self {
        TransformError::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
