//! Writing tables to disk and reading them back.

use std::collections::BTreeMap;
use std::fs::File;

use dg6_model::OutputFormat;
use dg6_output::{OutputError, export_tables};
use polars::prelude::*;
use tempfile::TempDir;

fn tables() -> BTreeMap<String, DataFrame> {
    let prices = DataFrame::new(vec![
        Series::new("코드".into(), &["A005930", "A005930"]).into_column(),
        Series::new("date".into(), &["2016-01-04", "2016-01-05"]).into_column(),
        Series::new("수정주가(원)".into(), vec![Some(25_200.0), None]).into_column(),
    ])
    .unwrap();
    let volume = DataFrame::new(vec![
        Series::new("코드".into(), &["A005930"]).into_column(),
        Series::new("거래량(주)".into(), &[1_000.0]).into_column(),
    ])
    .unwrap();
    BTreeMap::from([
        ("prices".to_string(), prices),
        ("volume".to_string(), volume),
    ])
}

fn meta() -> DataFrame {
    DataFrame::new(vec![
        Series::new("table_name".into(), &["prices", "volume"]).into_column(),
        Series::new("unit_multiplier".into(), &[1i64, 1]).into_column(),
    ])
    .unwrap()
}

#[test]
fn parquet_export_round_trips() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("nested").join("outputs");
    let written = export_tables(&tables(), &meta(), &out, OutputFormat::Parquet).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["prices.parquet", "volume.parquet", "_meta.parquet"]);

    let prices = ParquetReader::new(File::open(&written[0]).unwrap())
        .finish()
        .unwrap();
    assert_eq!(prices.height(), 2);
    assert_eq!(prices.column("수정주가(원)").unwrap().dtype(), &DataType::Float64);
    assert_eq!(prices.column("수정주가(원)").unwrap().null_count(), 1);
}

#[test]
fn csv_export_writes_headers() {
    let dir = TempDir::new().unwrap();
    let written = export_tables(&tables(), &meta(), dir.path(), OutputFormat::Csv).unwrap();
    assert_eq!(written.len(), 3);

    let text = std::fs::read_to_string(dir.path().join("_meta.csv")).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("table_name,unit_multiplier"));
    assert_eq!(lines.next(), Some("prices,1"));

    let volume = std::fs::read_to_string(dir.path().join("volume.csv")).unwrap();
    assert!(volume.starts_with("코드,거래량(주)"));
}

#[test]
fn reserved_table_name_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("outputs");
    let mut tables = tables();
    let meta_frame = meta();
    tables.insert("_meta".to_string(), meta_frame.clone());

    let err = export_tables(&tables, &meta_frame, &out, OutputFormat::Csv).unwrap_err();
    assert!(matches!(err, OutputError::InvalidTableName { .. }));
    assert!(!out.exists());
}
