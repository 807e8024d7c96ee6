//! Format detection.
//!
//! Matches a file's leading rows against the registry's layouts in priority
//! order and picks the parser for the first match. Timeseries layouts come
//! first so a timeseries export is never taken for a looser misc layout.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use dg6_model::{FormatCategory, FormatOrientation, Layout};
use regex::Regex;

use crate::error::{IngestError, Result};
use crate::registry::LayoutRegistry;
use crate::source::read_head_rows;

/// Fixed columns that precede the date columns in a wide timeseries header.
pub const WIDE_FIXED_COLUMNS: [&str; 6] =
    ["코드", "코드명", "유형", "아이템코드", "아이템명", "집계주기"];

const PREVIEW_ROWS: usize = 10;

/// Date header cells: `YYYY-MM-DD` or `YYYYMMDD`.
static DATE_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}|\d{8})").expect("Invalid date header regex")
});

/// The parser selected for a `(category, orientation)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    TimeSeriesWide,
    Misc,
    Snapshot,
}

impl ParserKind {
    /// Selects a parser, or `None` when no parser handles the pair.
    pub fn select(category: &FormatCategory, orientation: FormatOrientation) -> Option<Self> {
        match (category, orientation) {
            (FormatCategory::Timeseries, FormatOrientation::Wide) => Some(Self::TimeSeriesWide),
            (FormatCategory::Misc, _) => Some(Self::Misc),
            (FormatCategory::Snapshot, _) => Some(Self::Snapshot),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TimeSeriesWide => "timeseries_wide",
            Self::Misc => "misc",
            Self::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A matched layout and the parser that handles it.
#[derive(Debug, Clone)]
pub struct Detection {
    pub layout: Layout,
    pub parser: ParserKind,
}

/// Detects which registered layout a file follows.
pub fn detect_format(path: &Path, registry: &LayoutRegistry) -> Result<Detection> {
    let rows = read_head_rows(path, registry.rows_needed())?;
    if rows.is_empty() {
        return Err(IngestError::UnknownFormat {
            path: path.to_path_buf(),
            preview: "(file is empty)".to_string(),
        });
    }

    for layout in registry.layouts() {
        if !layout_matches(layout, &rows) {
            tracing::debug!(format_name = %layout.format_name, "Layout did not match");
            continue;
        }
        let parser = ParserKind::select(&layout.format_category, layout.format_orientation)
            .ok_or_else(|| IngestError::UnsupportedLayout {
                format_name: layout.format_name.clone(),
                category: layout.format_category.clone(),
                orientation: layout.format_orientation,
            })?;
        tracing::info!(
            path = %path.display(),
            format_name = %layout.format_name,
            parser = %parser,
            "Detected format"
        );
        return Ok(Detection {
            layout: layout.clone(),
            parser,
        });
    }

    Err(IngestError::UnknownFormat {
        path: path.to_path_buf(),
        preview: preview(&rows),
    })
}

/// True when every detection rule of `layout` holds for `rows`.
pub fn layout_matches(layout: &Layout, rows: &[Vec<String>]) -> bool {
    let cell = |row: usize, col: usize| {
        rows.get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
    };

    let cells_match = layout
        .detection
        .check_cell
        .iter()
        .all(|check| cell(check.row, check.col) == Some(check.value.as_str()));
    if !cells_match {
        return false;
    }

    let Some(required) = &layout.detection.check_data_header_cols else {
        return true;
    };
    let Some(header) = rows.get(layout.data_header_row()) else {
        return false;
    };
    if !required.iter().all(|name| header.contains(name)) {
        return false;
    }

    if layout.format_category == FormatCategory::Timeseries
        && layout.format_orientation == FormatOrientation::Wide
    {
        return header
            .iter()
            .skip(WIDE_FIXED_COLUMNS.len())
            .any(|cell| DATE_CELL.is_match(cell));
    }
    true
}

fn preview(rows: &[Vec<String>]) -> String {
    rows.iter()
        .take(PREVIEW_ROWS)
        .map(|row| row.join(","))
        .collect::<Vec<_>>()
        .join("\n")
}
