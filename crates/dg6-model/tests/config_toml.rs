//! TOML round-trip of the run configuration.

use std::collections::BTreeMap;

use dg6_model::{IngestConfig, OutputFormat, SourceMetadata};

#[test]
fn config_survives_save_and_reload() {
    let metadata = SourceMetadata {
        last_updated: Some("2026-02-07 10:12:01".to_string()),
        frequency: Some("일간".to_string()),
        calendar_basis: Some(true),
        period_start: Some("20160101".to_string()),
        extra: BTreeMap::from([("fiscal_basis".to_string(), "연결".to_string())]),
        ..SourceMetadata::default()
    };
    let mut config = IngestConfig::generate_default(
        "inputs/ohlcv.csv",
        "timeseries_wide",
        metadata,
        vec!["수정시가(원)".to_string(), "거래대금(원)".to_string()],
        None,
    );
    config.output.output_format = OutputFormat::Csv;
    config
        .tables
        .insert("volume".to_string(), vec!["거래량(주)".to_string()]);

    let text = config.to_toml_string().unwrap();
    assert!(text.contains("[source]"));
    assert!(text.contains("output_format = \"csv\""));

    let reloaded = IngestConfig::from_toml_str(&text).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn hand_edited_config_decodes() {
    let text = r#"
[source]
input_path = "inputs/etf.csv"
detected_format = "misc_etf"

[metadata]
data_category = "ETF 구성종목"

[output]
output_dir = "out/"
normalize_units = false

[tables]
holdings = ["주식수(계약수)", "금액"]
weights = ["금액기준 구성비중(%)"]
"#;
    let config = IngestConfig::from_toml_str(text).unwrap();
    assert_eq!(config.source.detected_format, "misc_etf");
    assert_eq!(config.metadata.data_category.as_deref(), Some("ETF 구성종목"));
    assert!(!config.output.normalize_units);
    assert!(config.output.drop_empty_entities);
    assert_eq!(config.output.output_format, OutputFormat::Parquet);
    assert_eq!(config.tables.len(), 2);
    assert_eq!(config.referenced_item_count(), 3);
    assert!(config.validate().is_ok());
}

#[test]
fn malformed_config_is_rejected() {
    let text = r#"
[source]
input_path = "inputs/etf.csv"

[output]
output_format = "xlsx"
"#;
    assert!(IngestConfig::from_toml_str(text).is_err());
}
