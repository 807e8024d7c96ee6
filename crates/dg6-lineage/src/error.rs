use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LineageError {
    #[error("DataFrame error: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for LineageError {
    fn from(err: PolarsError) -> Self {
        LineageError::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LineageError>;
