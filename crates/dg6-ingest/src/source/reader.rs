//! Header-block and data-block reading.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::*;

use crate::error::{IngestError, Result};

use super::header::{dedupe_headers, normalize_cell, parse_csv_line};

/// Reads the first `n` lines of a file as trimmed cell rows.
///
/// A leading UTF-8 byte-order mark is dropped. Rows keep their physical line
/// position so layout coordinates index them directly.
pub fn read_head_rows(path: &Path, n: usize) -> Result<Vec<Vec<String>>> {
    let file = File::open(path).map_err(|e| IngestError::open(path, e))?;
    let reader = BufReader::new(file);
    let mut rows = Vec::with_capacity(n);

    for line_result in reader.lines().take(n) {
        let line = line_result.map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        // Skip BOM if present
        let cleaned = line.strip_prefix('\u{feff}').unwrap_or(&line);
        rows.push(parse_csv_line(cleaned));
    }

    Ok(rows)
}

/// The tabular part of a source file, all cells as trimmed text.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Unique column names from the data header row.
    pub headers: Vec<String>,
    /// Data rows, each exactly `headers.len()` cells wide.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[idx].as_str())
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Converts the table into a DataFrame of string columns.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<String> = self.column(idx).map(str::to_string).collect();
                Series::new(name.as_str().into(), values).into_column()
            })
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}

/// Reads the data block whose header sits on line `header_row` (zero-based).
///
/// Blank lines are skipped. Short rows are padded with empty cells and long
/// rows truncated to the header width.
pub fn read_data_block(path: &Path, header_row: usize) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::open(path, e))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let start = if header_row == 0 {
        0
    } else {
        match text.match_indices('\n').nth(header_row - 1) {
            Some((idx, _)) => idx + 1,
            None => text.len(),
        }
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text[start..].as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let cells: Vec<String> = record.iter().map(normalize_cell).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        match &headers {
            None => headers = Some(dedupe_headers(cells)),
            Some(names) => {
                let mut row = cells;
                row.resize(names.len(), String::new());
                rows.push(row);
            }
        }
    }

    let Some(headers) = headers else {
        return Err(IngestError::parsing(
            path,
            format!("no data header row found at line {header_row}"),
        ));
    };

    tracing::debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "Read data block"
    );

    Ok(RawTable { headers, rows })
}
