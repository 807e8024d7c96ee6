//! Stage 4: table splitting.

use std::collections::{BTreeMap, HashSet};

use polars::prelude::*;

use crate::error::Result;
use crate::frame::column_names;

/// Splits the working table into one table per configured group.
///
/// Every table carries the key columns followed by the group's columns that
/// exist in `df`, in configured order. Listed columns that are absent are
/// skipped with a warning; a group left with no columns is omitted.
pub fn split_tables(
    df: &DataFrame,
    groups: &BTreeMap<String, Vec<String>>,
    key_columns: &[String],
) -> Result<BTreeMap<String, DataFrame>> {
    let available: HashSet<String> = column_names(df).into_iter().collect();
    let keys: Vec<&str> = key_columns
        .iter()
        .filter(|key| available.contains(*key))
        .map(String::as_str)
        .collect();

    let mut tables = BTreeMap::new();
    for (table_name, columns) in groups {
        let mut seen = HashSet::new();
        let (present, missing): (Vec<&String>, Vec<&String>) = columns
            .iter()
            .filter(|column| !keys.contains(&column.as_str()) && seen.insert(column.as_str()))
            .partition(|column| available.contains(*column));
        if !missing.is_empty() {
            tracing::warn!(
                table = %table_name,
                missing = ?missing,
                "Columns not found in table (possibly renamed by unit normalization)"
            );
        }
        if present.is_empty() {
            tracing::warn!(table = %table_name, "No matching columns, skipping table");
            continue;
        }

        let selection: Vec<&str> = keys
            .iter()
            .copied()
            .chain(present.iter().map(|column| column.as_str()))
            .collect();
        tables.insert(table_name.clone(), df.select(selection)?);
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("코드".into(), &["A001"]).into_column(),
            Series::new("date".into(), &["2016-01-04"]).into_column(),
            Series::new("시가(원)".into(), &[1.0]).into_column(),
            Series::new("종가(원)".into(), &[2.0]).into_column(),
            Series::new("거래량(주)".into(), &[3.0]).into_column(),
        ])
        .unwrap()
    }

    fn keys() -> Vec<String> {
        vec!["코드".to_string(), "date".to_string()]
    }

    #[test]
    fn test_each_group_gets_keys_and_its_columns() {
        let groups = BTreeMap::from([
            ("prices".to_string(), vec!["종가(원)".to_string(), "시가(원)".to_string()]),
            ("volume".to_string(), vec!["거래량(주)".to_string()]),
        ]);
        let tables = split_tables(&frame(), &groups, &keys()).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(
            column_names(&tables["prices"]),
            vec!["코드", "date", "종가(원)", "시가(원)"]
        );
        assert_eq!(column_names(&tables["volume"]), vec!["코드", "date", "거래량(주)"]);
    }

    #[test]
    fn test_absent_columns_are_skipped() {
        let groups = BTreeMap::from([(
            "prices".to_string(),
            vec!["종가(원)".to_string(), "매출액(억원)".to_string()],
        )]);
        let tables = split_tables(&frame(), &groups, &keys()).unwrap();
        assert_eq!(column_names(&tables["prices"]), vec!["코드", "date", "종가(원)"]);
    }

    #[test]
    fn test_group_without_present_columns_is_omitted() {
        let groups = BTreeMap::from([
            ("gone".to_string(), vec!["매출액(억원)".to_string()]),
            ("volume".to_string(), vec!["거래량(주)".to_string()]),
        ]);
        let tables = split_tables(&frame(), &groups, &keys()).unwrap();
        assert!(!tables.contains_key("gone"));
        assert!(tables.contains_key("volume"));
    }
}
