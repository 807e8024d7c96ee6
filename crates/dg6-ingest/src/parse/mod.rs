//! Format-specific parsers.
//!
//! Every parser turns a source file into a [`ParseResult`]: a canonical
//! entity/date/item table plus the metadata and items discovered on the way.
//! Parsers are a closed set selected by [`ParserKind`].

mod misc;
mod timeseries;

use std::path::Path;

use dg6_model::{ItemInfo, Layout, SourceMetadata};
use polars::prelude::DataFrame;

use crate::detect::{Detection, ParserKind};
use crate::error::{IngestError, Result};
use crate::registry::extract_settings;
use crate::source::read_head_rows;

pub use misc::{DATE_COLUMN, VALUE_SAMPLE_SIZE, is_value_column, parse_misc};
pub use timeseries::parse_timeseries_wide;

/// Parsed source file, produced once per file and not mutated afterwards.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Canonical table; every column holds text at this stage.
    pub table: DataFrame,
    pub metadata: SourceMetadata,
    /// One entry per distinct item, in order of first appearance.
    pub items: Vec<ItemInfo>,
    /// The "Last Updated" stamp from the header block.
    pub source_last_updated: Option<String>,
    pub format_name: String,
    /// Identifier and date columns; everything else holds values.
    pub key_columns: Vec<String>,
}

impl ParseResult {
    pub fn item_names(&self) -> Vec<String> {
        self.items.iter().map(|item| item.item_name.clone()).collect()
    }
}

/// Parses a file with the parser chosen at detection time.
pub fn parse_file(path: &Path, detection: &Detection) -> Result<ParseResult> {
    match detection.parser {
        ParserKind::TimeSeriesWide => parse_timeseries_wide(path, &detection.layout),
        ParserKind::Misc => parse_misc(path, &detection.layout),
        ParserKind::Snapshot => parse_snapshot(path, &detection.layout),
    }
}

/// Snapshot exports are recognised but not parsed yet.
pub fn parse_snapshot(_path: &Path, _layout: &Layout) -> Result<ParseResult> {
    Err(IngestError::NotImplemented { parser: "snapshot" })
}

/// Extracts header-block metadata through the layout's settings.
///
/// Returns the metadata and the source's last-updated stamp.
pub(crate) fn read_metadata(
    path: &Path,
    layout: &Layout,
) -> Result<(SourceMetadata, Option<String>)> {
    let head = read_head_rows(path, layout.data_header_row() + 2)?;
    let metadata = SourceMetadata::from_settings(extract_settings(layout, &head));
    let last_updated = metadata.last_updated.clone();
    Ok((metadata, last_updated))
}

/// Maps an empty cell to `None`.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// First ten column names, for error messages.
pub(crate) fn column_sample(headers: &[String]) -> String {
    headers
        .iter()
        .take(10)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
