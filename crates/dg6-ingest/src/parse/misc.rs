//! Misc/long parser.
//!
//! Misc extracts are already one row per observation; the parser only
//! names the date column and sorts columns into keys and values by looking
//! at their data.

use std::path::Path;

use dg6_model::{ItemInfo, Layout, parse_number};

use crate::error::{IngestError, Result};
use crate::source::{RawTable, read_data_block};

use super::{ParseResult, column_sample, read_metadata};

/// Canonical name of the date column.
pub const DATE_COLUMN: &str = "date";

/// Vendor name of the date column in misc extracts.
const VENDOR_DATE_COLUMN: &str = "날짜";

/// Non-empty cells sampled per column during classification.
pub const VALUE_SAMPLE_SIZE: usize = 20;

/// Parses a misc extract, keeping its rows as they are.
pub fn parse_misc(path: &Path, layout: &Layout) -> Result<ParseResult> {
    tracing::info!(
        path = %path.display(),
        format_name = %layout.format_name,
        "Parsing misc format file"
    );

    let (metadata, source_last_updated) = read_metadata(path, layout)?;
    let mut raw = read_data_block(path, layout.data_header_row())?;
    normalize_date_column(&mut raw, path)?;
    tracing::info!(rows = raw.height(), columns = raw.headers.len(), "Parsed misc table");

    let value_columns = classify_value_columns(&raw);
    let key_columns: Vec<String> = raw
        .headers
        .iter()
        .filter(|name| !value_columns.contains(name))
        .cloned()
        .collect();
    tracing::info!(
        value_columns = value_columns.len(),
        key_columns = key_columns.len(),
        "Classified columns"
    );

    let items = value_columns.iter().map(ItemInfo::named).collect();
    Ok(ParseResult {
        table: raw.to_dataframe()?,
        metadata,
        items,
        source_last_updated,
        format_name: layout.format_name.clone(),
        key_columns,
    })
}

fn normalize_date_column(raw: &mut RawTable, path: &Path) -> Result<()> {
    let vendor = raw.column_index(VENDOR_DATE_COLUMN);
    if vendor.is_some() && raw.column_index(DATE_COLUMN).is_some() {
        return Err(IngestError::parsing(
            path,
            format!("both '{VENDOR_DATE_COLUMN}' and '{DATE_COLUMN}' columns present"),
        ));
    }
    if let Some(idx) = vendor {
        raw.headers[idx] = DATE_COLUMN.to_string();
        return Ok(());
    }
    if raw.column_index(DATE_COLUMN).is_some() {
        return Ok(());
    }
    Err(IngestError::parsing(
        path,
        format!(
            "no date column ('{VENDOR_DATE_COLUMN}' or '{DATE_COLUMN}') found; columns: [{}]",
            column_sample(&raw.headers)
        ),
    ))
}

/// Columns other than the date whose data is predominantly numeric.
fn classify_value_columns(raw: &RawTable) -> Vec<String> {
    raw.headers
        .iter()
        .enumerate()
        .filter(|(_, name)| name.as_str() != DATE_COLUMN)
        .filter(|(idx, _)| is_value_column(raw.column(*idx)))
        .map(|(_, name)| name.clone())
        .collect()
}

/// True when more than half of the first [`VALUE_SAMPLE_SIZE`] non-empty
/// cells parse as numbers. A column with no non-empty cells is a key.
pub fn is_value_column<'a>(cells: impl IntoIterator<Item = &'a str>) -> bool {
    let mut sampled = 0usize;
    let mut numeric = 0usize;
    for cell in cells
        .into_iter()
        .filter(|cell| !cell.trim().is_empty())
        .take(VALUE_SAMPLE_SIZE)
    {
        sampled += 1;
        if parse_number(cell).is_some() {
            numeric += 1;
        }
    }
    sampled > 0 && numeric * 2 > sampled
}
