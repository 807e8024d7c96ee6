//! Stage 2: monetary unit normalization.

use std::collections::{BTreeMap, HashSet};

use dg6_model::{UnitInfo, detect_unit, normalize_column_name};
use polars::prelude::*;

use crate::error::{Result, TransformError};
use crate::frame::{column_names, float_column, float_values, is_key};

/// Scales monetary columns to the base unit and renames their suffix.
///
/// Returns the new table and a unit record per monetary column, keyed by
/// the column's name before renaming. Base-unit columns are recorded with
/// multiplier 1 and left as they are. A rename onto a name that already
/// exists, or onto another column's new name, is a `RenameConflict`.
pub fn normalize_units(
    df: &DataFrame,
    key_columns: &[String],
) -> Result<(DataFrame, BTreeMap<String, UnitInfo>)> {
    let existing: HashSet<String> = column_names(df).into_iter().collect();
    let mut renamed_to: HashSet<String> = HashSet::new();
    let mut unit_info = BTreeMap::new();
    let mut columns = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let name = column.name().as_str();
        let unit = if is_key(name, key_columns) {
            None
        } else {
            detect_unit(name)
        };
        let Some(unit) = unit else {
            columns.push(column.clone());
            continue;
        };

        if unit.is_scaled() {
            let renamed = normalize_column_name(name);
            if existing.contains(&renamed) || !renamed_to.insert(renamed.clone()) {
                return Err(TransformError::RenameConflict {
                    from: name.to_string(),
                    to: renamed,
                });
            }
            let factor = unit.multiplier as f64;
            let scaled = float_values(column)?
                .into_iter()
                .map(|value| value.map(|v| v * factor))
                .collect();
            tracing::debug!(
                column = name,
                renamed = %renamed,
                multiplier = unit.multiplier,
                "Scaled monetary column"
            );
            columns.push(float_column(&renamed, scaled));
        } else {
            columns.push(column.clone());
        }
        unit_info.insert(name.to_string(), unit);
    }

    Ok((DataFrame::new(columns)?, unit_info))
}

/// Post-normalization name of a column given the recorded unit info.
pub fn normalized_name(column: &str, unit_info: &BTreeMap<String, UnitInfo>) -> String {
    match unit_info.get(column) {
        Some(unit) if unit.is_scaled() => normalize_column_name(column),
        _ => column.to_string(),
    }
}
