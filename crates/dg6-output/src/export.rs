//! Table export.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use dg6_model::OutputFormat;
use polars::prelude::*;

use crate::error::{OutputError, Result};

/// File stem of the lineage table.
pub const META_TABLE_NAME: &str = "_meta";

/// Writes every table and the meta table into `output_dir`.
///
/// Files are named `<table>.<ext>` and `_meta.<ext>`. The directory is
/// created if needed. Returns the written paths, tables first in name
/// order and the meta table last.
pub fn export_tables(
    tables: &BTreeMap<String, DataFrame>,
    meta: &DataFrame,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    for name in tables.keys() {
        check_table_name(name)?;
    }
    fs::create_dir_all(output_dir).map_err(|source| OutputError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(tables.len() + 1);
    for (name, table) in tables {
        written.push(write_table(table, output_dir, name, format)?);
    }
    written.push(write_table(meta, output_dir, META_TABLE_NAME, format)?);

    tracing::info!(
        files = written.len(),
        dir = %output_dir.display(),
        format = %format,
        "Exported tables"
    );
    Ok(written)
}

/// Writes one table as `<dir>/<name>.<ext>`.
pub fn write_table(
    df: &DataFrame,
    dir: &Path,
    name: &str,
    format: OutputFormat,
) -> Result<PathBuf> {
    let path = dir.join(format!("{name}.{}", format.extension()));
    let mut file = File::create(&path).map_err(|source| OutputError::CreateFile {
        path: path.clone(),
        source,
    })?;

    let mut df = df.clone();
    let outcome = match format {
        OutputFormat::Csv => CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df),
        OutputFormat::Parquet => ParquetWriter::new(&mut file).finish(&mut df).map(|_| ()),
    };
    outcome.map_err(|err| OutputError::Write {
        path: path.clone(),
        message: err.to_string(),
    })?;

    tracing::debug!(path = %path.display(), rows = df.height(), "Wrote table");
    Ok(path)
}

fn check_table_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name == META_TABLE_NAME {
        Some("reserved for the meta table")
    } else if name.contains(['/', '\\']) || name == "." || name == ".." {
        Some("name must not contain path components")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(OutputError::InvalidTableName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
