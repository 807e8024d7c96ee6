//! Wide time-series parser.
//!
//! The export has one row per `(entity, item)` with dates spread across the
//! columns after the fixed block. Rows are reshaped into one row per
//! `(entity, date)` with one column per item.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use dg6_model::{ItemInfo, Layout};
use polars::prelude::*;

use crate::detect::WIDE_FIXED_COLUMNS;
use crate::error::{IngestError, Result};
use crate::source::{RawTable, read_data_block};

use super::{ParseResult, column_sample, non_empty, read_metadata};

const CODE: &str = "코드";
const NAME: &str = "코드명";
const ITEM_TYPE: &str = "유형";
const ITEM_CODE: &str = "아이템코드";
const ITEM_NAME: &str = "아이템명";
const AGGREGATION: &str = "집계주기";
const DATE: &str = "date";

/// Column positions of the fixed block.
struct FixedColumns {
    code: usize,
    name: usize,
    item_type: usize,
    item_code: usize,
    item_name: usize,
    aggregation: usize,
}

impl FixedColumns {
    fn locate(raw: &RawTable, path: &Path) -> Result<Self> {
        let missing: Vec<&str> = WIDE_FIXED_COLUMNS
            .iter()
            .copied()
            .filter(|name| raw.column_index(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::parsing(
                path,
                format!(
                    "expected columns [{}] not found; columns found: [{}]",
                    missing.join(", "),
                    column_sample(&raw.headers)
                ),
            ));
        }
        let index = |name: &str| raw.column_index(name).unwrap_or_default();
        Ok(Self {
            code: index(CODE),
            name: index(NAME),
            item_type: index(ITEM_TYPE),
            item_code: index(ITEM_CODE),
            item_name: index(ITEM_NAME),
            aggregation: index(AGGREGATION),
        })
    }
}

/// Parses a wide time-series export into `(코드, 코드명, date, items...)`.
pub fn parse_timeseries_wide(path: &Path, layout: &Layout) -> Result<ParseResult> {
    tracing::info!(path = %path.display(), "Parsing wide time series file");

    let (metadata, source_last_updated) = read_metadata(path, layout)?;
    let raw = read_data_block(path, layout.data_header_row())?;
    let fixed = FixedColumns::locate(&raw, path)?;

    let date_columns: Vec<(usize, &str)> = raw
        .headers
        .iter()
        .enumerate()
        .skip(fixed.aggregation + 1)
        .map(|(idx, name)| (idx, name.as_str()))
        .collect();
    if date_columns.is_empty() {
        return Err(IngestError::parsing(
            path,
            format!("no date columns found after {AGGREGATION}"),
        ));
    }
    tracing::info!(
        date_columns = date_columns.len(),
        rows = raw.height(),
        "Found date columns"
    );

    let items = collect_items(&raw, &fixed);
    let table = pivot(&raw, &fixed, &date_columns)?;
    tracing::info!(
        rows = table.height(),
        columns = table.width(),
        "Pivoted to canonical table"
    );

    Ok(ParseResult {
        table,
        metadata,
        items,
        source_last_updated,
        format_name: layout.format_name.clone(),
        key_columns: vec![CODE.to_string(), NAME.to_string(), DATE.to_string()],
    })
}

/// One item per distinct `(아이템코드, 아이템명)`, attributes from its first row.
fn collect_items(raw: &RawTable, fixed: &FixedColumns) -> Vec<ItemInfo> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut items = Vec::new();
    for row in &raw.rows {
        let key = (row[fixed.item_code].as_str(), row[fixed.item_name].as_str());
        if !seen.insert(key) {
            continue;
        }
        items.push(ItemInfo {
            item_code: non_empty(key.0),
            item_name: key.1.to_string(),
            item_type: non_empty(&row[fixed.item_type]),
            aggregation_period: non_empty(&row[fixed.aggregation]),
        });
    }
    items
}

/// Melts the date columns and pivots on item name.
///
/// Output rows are ordered by `(코드, 코드명, date)` and item columns by
/// name. A repeated `(entity, item, date)` cell keeps its first value.
fn pivot(
    raw: &RawTable,
    fixed: &FixedColumns,
    date_columns: &[(usize, &str)],
) -> Result<DataFrame> {
    type RowKey<'a> = (&'a str, &'a str, &'a str);

    let mut cells: BTreeMap<RowKey<'_>, BTreeMap<&str, &str>> = BTreeMap::new();
    let mut item_names: BTreeSet<&str> = BTreeSet::new();
    let mut collisions = 0usize;

    for row in &raw.rows {
        let item = row[fixed.item_name].as_str();
        item_names.insert(item);
        for &(idx, date) in date_columns {
            let key = (row[fixed.code].as_str(), row[fixed.name].as_str(), date);
            let values = cells.entry(key).or_default();
            if values.contains_key(item) {
                collisions += 1;
            } else {
                values.insert(item, row[idx].as_str());
            }
        }
    }
    if collisions > 0 {
        tracing::debug!(collisions, "Duplicate (entity, item, date) cells kept first value");
    }

    let mut codes = Vec::with_capacity(cells.len());
    let mut names = Vec::with_capacity(cells.len());
    let mut dates = Vec::with_capacity(cells.len());
    let mut item_values: Vec<Vec<Option<String>>> =
        vec![Vec::with_capacity(cells.len()); item_names.len()];

    for ((code, name, date), values) in &cells {
        codes.push((*code).to_string());
        names.push((*name).to_string());
        dates.push((*date).to_string());
        for (column, item) in item_values.iter_mut().zip(&item_names) {
            column.push(values.get(item).map(|v| (*v).to_string()));
        }
    }

    let mut columns = vec![
        Series::new(CODE.into(), codes).into_column(),
        Series::new(NAME.into(), names).into_column(),
        Series::new(DATE.into(), dates).into_column(),
    ];
    for (item, values) in item_names.iter().zip(item_values) {
        columns.push(Series::new((*item).into(), values).into_column());
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        }
    }

    const HEADERS: &[&str] = &[
        "코드", "코드명", "유형", "아이템코드", "아이템명", "집계주기", "2016-01-04", "2016-01-05",
    ];

    #[test]
    fn test_collect_items_deduplicates_code_and_name() {
        let table = raw(
            HEADERS,
            &[
                &["A005930", "삼성전자", "SSC", "S410000650", "수정시가(원)", "일간", "1", "2"],
                &["A000660", "SK하이닉스", "SSC", "S410000650", "수정시가(원)", "일간", "3", "4"],
                &["A005930", "삼성전자", "", "", "거래량(주)", "", "5", "6"],
            ],
        );
        let fixed = FixedColumns::locate(&table, Path::new("x.csv")).unwrap();
        let items = collect_items(&table, &fixed);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item_code.as_deref(), Some("S410000650"));
        assert_eq!(items[0].item_type.as_deref(), Some("SSC"));
        assert_eq!(items[1].item_name, "거래량(주)");
        assert_eq!(items[1].item_code, None);
        assert_eq!(items[1].aggregation_period, None);
    }

    #[test]
    fn test_pivot_first_value_wins_and_missing_cells_are_null() {
        let table = raw(
            HEADERS,
            &[
                &["A001", "가", "SSC", "I1", "종가(원)", "일간", "10", "11"],
                &["A001", "가", "SSC", "I1", "종가(원)", "일간", "99", "99"],
                &["A002", "나", "SSC", "I2", "거래량(주)", "일간", "5", "6"],
            ],
        );
        let fixed = FixedColumns::locate(&table, Path::new("x.csv")).unwrap();
        let dates = vec![(6, "2016-01-04"), (7, "2016-01-05")];
        let df = pivot(&table, &fixed, &dates).unwrap();

        assert_eq!(df.height(), 4);
        let close = df.column("종가(원)").unwrap().str().unwrap();
        assert_eq!(close.get(0), Some("10"));
        assert_eq!(close.get(1), Some("11"));
        assert_eq!(close.get(2), None);
        let volume = df.column("거래량(주)").unwrap().str().unwrap();
        assert_eq!(volume.get(0), None);
        assert_eq!(volume.get(3), Some("6"));
    }

    #[test]
    fn test_locate_reports_missing_columns() {
        let table = raw(&["코드", "코드명", "2016-01-04"], &[]);
        let Err(IngestError::Parsing { message, .. }) = FixedColumns::locate(&table, Path::new("x.csv"))
        else {
            panic!("expected parsing error");
        };
        assert!(message.contains("아이템명"));
        assert!(message.contains("columns found: [코드, 코드명, 2016-01-04]"));
    }
}
