//! Declarative layout definitions.
//!
//! A layout describes one vendor export: which cells identify it, where the
//! metadata fields live in the header block and on which row the data table
//! starts. Layouts are decoded from TOML and never mutated afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Broad category of an export, used to order detection attempts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormatCategory {
    Timeseries,
    Snapshot,
    Misc,
    /// A category this build does not know; sorts after every known one.
    Other(String),
}

impl FormatCategory {
    /// Detection priority; lower values are tried first.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Timeseries => 0,
            Self::Snapshot => 1,
            Self::Misc => 2,
            Self::Other(_) => 99,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Timeseries => "timeseries",
            Self::Snapshot => "snapshot",
            Self::Misc => "misc",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for FormatCategory {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "timeseries" => Self::Timeseries,
            "snapshot" => Self::Snapshot,
            "misc" => Self::Misc,
            _ => Self::Other(value),
        }
    }
}

impl From<FormatCategory> for String {
    fn from(value: FormatCategory) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FormatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether dates run across columns (wide) or down rows (long).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatOrientation {
    Wide,
    Long,
}

impl FormatOrientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wide => "wide",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for FormatOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a metadata cell is turned into a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ParseMode {
    /// Trimmed cell text; an empty cell is absent.
    #[default]
    Raw,
    /// Cell text with a literal prefix removed, then trimmed.
    StripPrefix(String),
    /// `true` when the cell holds any non-blank text.
    Presence,
}

impl TryFrom<String> for ParseMode {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        if let Some(prefix) = value.strip_prefix("strip_prefix:") {
            return Ok(Self::StripPrefix(prefix.to_string()));
        }
        match value.as_str() {
            "raw" | "" => Ok(Self::Raw),
            "presence" => Ok(Self::Presence),
            _ => Err(ModelError::InvalidParseMode(value)),
        }
    }
}

impl From<ParseMode> for String {
    fn from(value: ParseMode) -> Self {
        match value {
            ParseMode::Raw => "raw".to_string(),
            ParseMode::StripPrefix(prefix) => format!("strip_prefix:{prefix}"),
            ParseMode::Presence => "presence".to_string(),
        }
    }
}

/// Location and parse mode of one metadata field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingSpec {
    pub row: usize,
    pub col: usize,
    #[serde(default)]
    pub parse: ParseMode,
}

/// An exact `(row, col) == value` requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCheck {
    pub row: usize,
    pub col: usize,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionRules {
    #[serde(default)]
    pub check_cell: Vec<CellCheck>,
    /// Column names the header row must contain, when set.
    #[serde(default)]
    pub check_data_header_cols: Option<Vec<String>>,
    pub data_header_row: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub format_name: String,
    pub format_category: FormatCategory,
    pub format_orientation: FormatOrientation,
    pub detection: DetectionRules,
    #[serde(default)]
    pub settings: BTreeMap<String, SettingSpec>,
}

impl Layout {
    /// Decodes a layout from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let layout: Self =
            toml::from_str(text).map_err(|source| ModelError::LayoutToml { source })?;
        layout.check()?;
        Ok(layout)
    }

    pub fn data_header_row(&self) -> usize {
        self.detection.data_header_row
    }

    pub fn priority(&self) -> u8 {
        self.format_category.priority()
    }

    fn check(&self) -> Result<()> {
        if self.format_name.trim().is_empty() {
            return Err(ModelError::InvalidLayout {
                name: self.format_name.clone(),
                reason: "format_name must not be empty".to_string(),
            });
        }
        if let Some(cols) = &self.detection.check_data_header_cols
            && cols.is_empty()
        {
            return Err(ModelError::InvalidLayout {
                name: self.format_name.clone(),
                reason: "check_data_header_cols is present but empty".to_string(),
            });
        }
        Ok(())
    }
}
