//! Column access helpers shared by the stages.

use polars::prelude::*;

use crate::error::Result;

pub(crate) fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(ToString::to_string)
        .collect()
}

pub(crate) fn is_key(name: &str, key_columns: &[String]) -> bool {
    key_columns.iter().any(|key| key == name)
}

pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Values of a column as `f64`; NaN counts as missing.
pub(crate) fn float_values(column: &Column) -> Result<Vec<Option<f64>>> {
    let cast = column.cast(&DataType::Float64)?;
    let values = cast
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|value| value.filter(|v| !v.is_nan()))
        .collect();
    Ok(values)
}

/// Values of a column rendered as text.
pub(crate) fn text_values(column: &Column) -> Result<Vec<Option<String>>> {
    let cast = column.cast(&DataType::String)?;
    let values = cast
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|value| value.map(ToString::to_string))
        .collect();
    Ok(values)
}

pub(crate) fn float_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Series::new(name.into(), values).into_column()
}
