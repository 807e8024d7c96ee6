//! Monetary unit vocabulary.
//!
//! Column names carry their unit as a trailing parenthesized suffix, e.g.
//! `매출액(억원)`. Only the last group is inspected, and only the Korean won
//! scales below are monetary; `(주)`, `(%)` and friends are left alone.

use serde::{Deserialize, Serialize};

/// The base monetary unit every scaled column is converted to.
pub const BASE_UNIT: &str = "원";

/// Known monetary suffixes and their multiplier to [`BASE_UNIT`].
pub const MONETARY_UNITS: &[(&str, i64)] = &[
    ("원", 1),
    ("천원", 1_000),
    ("백만원", 1_000_000),
    ("억원", 100_000_000),
    ("십억원", 1_000_000_000),
];

/// Unit record for one monetary column, keyed elsewhere by its original name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInfo {
    pub unit: String,
    pub multiplier: i64,
}

impl UnitInfo {
    /// True when values were rescaled and the column renamed.
    pub fn is_scaled(&self) -> bool {
        self.multiplier > 1
    }
}

/// Splits a trailing `(...)` group off a column name.
///
/// Returns the stem and the inner text. The group must close the name and
/// must not be empty or nested.
fn split_suffix(column: &str) -> Option<(&str, &str)> {
    let body = column.strip_suffix(')')?;
    let open = body.rfind('(')?;
    let inner = &body[open + 1..];
    if inner.is_empty() || inner.contains(')') {
        return None;
    }
    Some((&column[..open], inner))
}

/// Detects the monetary unit of a column, if it has one.
pub fn detect_unit(column: &str) -> Option<UnitInfo> {
    let (_, suffix) = split_suffix(column)?;
    MONETARY_UNITS
        .iter()
        .find(|(unit, _)| *unit == suffix)
        .map(|(unit, multiplier)| UnitInfo {
            unit: (*unit).to_string(),
            multiplier: *multiplier,
        })
}

/// Replaces a column's trailing unit group with the base unit.
///
/// Names without a trailing group are returned unchanged.
pub fn normalize_column_name(column: &str) -> String {
    match split_suffix(column) {
        Some((stem, _)) => format!("{stem}({BASE_UNIT})"),
        None => column.to_string(),
    }
}
