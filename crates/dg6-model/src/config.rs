//! User-editable run configuration.
//!
//! The configuration is written once on the first run of a source file and
//! then hand-edited to regroup items into tables. Decoding is purely
//! structural; consistency is checked by [`IngestConfig::validate`] and
//! [`IngestConfig::validate_against_items`], which report every problem at
//! once instead of stopping at the first.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigIssue, ModelError, Result};
use crate::metadata::SourceMetadata;

/// Group name used when every item goes into a single table.
pub const DEFAULT_TABLE_NAME: &str = "default";

/// Entity identifier column in vendor exports.
pub const DEFAULT_ENTITY_COLUMN: &str = "코드";

const DEFAULT_OUTPUT_DIR: &str = "outputs/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub input_path: String,
    /// `format_name` of the layout that matched the source.
    pub detected_format: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    #[default]
    Parquet,
}

impl OutputFormat {
    /// File extension used for written tables.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_dir: String,
    pub output_format: OutputFormat,
    /// Scale monetary columns to the base unit.
    pub normalize_units: bool,
    /// Remove entities whose values are all missing.
    pub drop_empty_entities: bool,
    pub entity_column: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            output_format: OutputFormat::default(),
            normalize_units: true,
            drop_empty_entities: true,
            entity_column: DEFAULT_ENTITY_COLUMN.to_string(),
        }
    }
}

/// Top-level run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub metadata: SourceMetadata,
    #[serde(default)]
    pub output: OutputConfig,
    /// Table name to the item names it holds.
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<String>>,
}

impl IngestConfig {
    /// Builds the first-run configuration: one `default` table with every item.
    pub fn generate_default(
        input_path: impl Into<String>,
        detected_format: impl Into<String>,
        metadata: SourceMetadata,
        items: Vec<String>,
        output_dir: Option<String>,
    ) -> Self {
        let output = OutputConfig {
            output_dir: output_dir.unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            ..OutputConfig::default()
        };
        Self {
            source: SourceConfig {
                input_path: input_path.into(),
                detected_format: detected_format.into(),
            },
            metadata,
            output,
            tables: BTreeMap::from([(DEFAULT_TABLE_NAME.to_string(), items)]),
        }
    }

    /// Decodes a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|source| ModelError::ConfigToml { source })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|source| ModelError::ConfigSerialize { source })
    }

    /// Structural checks that need no source data.
    pub fn validate(&self) -> Result<()> {
        let issues: Vec<ConfigIssue> = self
            .tables
            .iter()
            .filter(|(_, items)| items.is_empty())
            .map(|(table, _)| ConfigIssue::EmptyGroup {
                table: table.clone(),
            })
            .collect();
        issues_to_result(issues)
    }

    /// Checks every referenced item against the items present in the source.
    pub fn validate_against_items(&self, available: &BTreeSet<String>) -> Result<()> {
        let mut issues = Vec::new();
        for (table, items) in &self.tables {
            let missing: Vec<String> = items
                .iter()
                .filter(|item| !available.contains(*item))
                .cloned()
                .collect();
            if !missing.is_empty() {
                issues.push(ConfigIssue::UnknownItems {
                    table: table.clone(),
                    items: missing,
                });
            }
        }
        issues_to_result(issues)
    }

    /// Total number of item references across all groups.
    pub fn referenced_item_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }
}

fn issues_to_result(issues: Vec<ConfigIssue>) -> Result<()> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ModelError::ConfigValidation { issues })
    }
}
