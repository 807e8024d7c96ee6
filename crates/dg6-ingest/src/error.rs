//! Error types for source ingestion.

use std::path::PathBuf;

use dg6_model::{FormatCategory, FormatOrientation, ModelError};
use thiserror::Error;

/// Errors that can occur while reading, detecting or parsing a source file.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a layout directory.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A built-in layout definition is malformed.
    #[error("built-in layout {name} is invalid: {source}")]
    BuiltinLayout {
        name: &'static str,
        #[source]
        source: ModelError,
    },

    // === Detection Errors ===
    /// No registered layout matched the file.
    #[error("could not detect format for {path}\nfirst rows:\n{preview}")]
    UnknownFormat { path: PathBuf, preview: String },

    /// A layout matched but no parser handles its category and orientation.
    #[error("no parser for {category}/{orientation} layout '{format_name}'")]
    UnsupportedLayout {
        format_name: String,
        category: FormatCategory,
        orientation: FormatOrientation,
    },

    // === Parsing Errors ===
    /// The matched layout's structural expectations were violated.
    #[error("failed to parse {path}: {message}")]
    Parsing { path: PathBuf, message: String },

    /// The selected parser has no implementation yet.
    #[error("{parser} parser is not implemented")]
    NotImplemented { parser: &'static str },

    /// Malformed CSV record in the data block.
    #[error("failed to read CSV record in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    pub(crate) fn open(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }

    pub(crate) fn parsing(path: &std::path::Path, message: impl Into<String>) -> Self {
        Self::Parsing {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
