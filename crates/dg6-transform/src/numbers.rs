//! Stage 1: number parsing.
//!
//! Vendor exports render numbers as text with thousands separators
//! (`"25,200"`). Every non-key column becomes `Float64`; anything that does
//! not parse, including blanks, becomes null rather than zero.

use dg6_model::parse_number;
use polars::prelude::*;

use crate::error::Result;
use crate::frame::{float_column, float_values, is_key};

/// Converts every non-key column to `Float64`.
pub fn parse_numbers(df: &DataFrame, key_columns: &[String]) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(df.width());
    let mut converted = 0usize;
    for column in df.get_columns() {
        let name = column.name().as_str();
        if is_key(name, key_columns) {
            columns.push(column.clone());
            continue;
        }
        columns.push(float_column(name, numeric_values(column)?));
        converted += 1;
    }
    tracing::debug!(columns = converted, "Converted value columns to numbers");
    Ok(DataFrame::new(columns)?)
}

fn numeric_values(column: &Column) -> Result<Vec<Option<f64>>> {
    match column.dtype() {
        DataType::String => Ok(column
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|value| value.and_then(parse_number))
            .collect()),
        _ => float_values(column),
    }
}
