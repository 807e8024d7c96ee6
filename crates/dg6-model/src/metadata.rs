//! Header-block metadata extracted through a layout.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single extracted setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Text(String),
    Flag(bool),
}

impl SettingValue {
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Flag(flag) => flag.to_string(),
        }
    }

    pub fn as_flag(&self) -> bool {
        match self {
            Self::Text(text) => !text.trim().is_empty(),
            Self::Flag(flag) => *flag,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

/// Source-level metadata keyed by semantic names rather than the vendor's labels.
///
/// Settings a layout declares beyond the known fields land in `extra`, so a new
/// layout can carry extra header fields without code changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_basis: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_portfolio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_business_days: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_weekends: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl SourceMetadata {
    /// Builds metadata from extracted settings.
    ///
    /// Absent values leave their field unset; unknown keys with a value go to
    /// `extra`.
    pub fn from_settings(settings: BTreeMap<String, Option<SettingValue>>) -> Self {
        let mut metadata = Self::default();
        for (key, value) in settings {
            let Some(value) = value else { continue };
            let slot = match key.as_str() {
                "calendar_basis" => {
                    metadata.calendar_basis = Some(value.as_flag());
                    continue;
                }
                "last_updated" => &mut metadata.last_updated,
                "data_category" => &mut metadata.data_category,
                "code_portfolio" => &mut metadata.code_portfolio,
                "frequency" => &mut metadata.frequency,
                "currency" => &mut metadata.currency,
                "sort_order" => &mut metadata.sort_order,
                "non_business_days" => &mut metadata.non_business_days,
                "include_weekends" => &mut metadata.include_weekends,
                "period_start" => &mut metadata.period_start,
                "period_end" => &mut metadata.period_end,
                _ => {
                    metadata.extra.insert(key, value.into_text());
                    continue;
                }
            };
            *slot = Some(value.into_text());
        }
        metadata
    }
}
