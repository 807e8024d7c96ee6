//! Error types for the ingestion data model.

use std::fmt;

use thiserror::Error;

/// A single problem found while validating a run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    /// A table group lists no items at all.
    EmptyGroup { table: String },
    /// A table group references items the source file does not contain.
    UnknownItems { table: String, items: Vec<String> },
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGroup { table } => {
                write!(f, "table group '{table}' has an empty item list")
            }
            Self::UnknownItems { table, items } => {
                write!(
                    f,
                    "table group '{table}' references items missing from the source: {}",
                    items.join(", ")
                )
            }
        }
    }
}

/// Errors raised while decoding layouts or validating configuration.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A layout definition could not be decoded.
    #[error("invalid layout definition: {source}")]
    LayoutToml {
        #[source]
        source: toml::de::Error,
    },

    /// A setting declares a parse mode that is not understood.
    #[error("unsupported parse mode '{0}' (expected raw, presence or strip_prefix:<prefix>)")]
    InvalidParseMode(String),

    /// A layout violates a structural rule (e.g. an empty name).
    #[error("invalid layout '{name}': {reason}")]
    InvalidLayout { name: String, reason: String },

    /// The run configuration could not be decoded.
    #[error("invalid configuration: {source}")]
    ConfigToml {
        #[source]
        source: toml::de::Error,
    },

    /// The run configuration could not be encoded.
    #[error("failed to serialize configuration: {source}")]
    ConfigSerialize {
        #[source]
        source: toml::ser::Error,
    },

    /// The run configuration is inconsistent with itself or with the parsed data.
    #[error("configuration validation failed: {}", join_issues(.issues))]
    ConfigValidation { issues: Vec<ConfigIssue> },
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
