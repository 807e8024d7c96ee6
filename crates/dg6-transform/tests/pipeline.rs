//! End-to-end pipeline behaviour on small canonical tables.

use std::collections::{BTreeMap, BTreeSet};

use dg6_model::UnitInfo;
use dg6_transform::{
    PipelineOptions, TransformPipeline, drop_empty_entities, parse_numbers, split_tables,
};
use polars::prelude::*;
use proptest::prelude::*;

fn keys() -> Vec<String> {
    vec!["코드".to_string(), "코드명".to_string(), "date".to_string()]
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Canonical text table as a parser would hand it over.
fn canonical() -> DataFrame {
    DataFrame::new(vec![
        Series::new("코드".into(), &["A001", "A001", "A999", "A999"]).into_column(),
        Series::new("코드명".into(), &["가", "가", "구", "구"]).into_column(),
        Series::new(
            "date".into(),
            &["2024-01-02", "2024-01-03", "2024-01-02", "2024-01-03"],
        )
        .into_column(),
        Series::new(
            "매출액(억원)".into(),
            vec![Some("100"), Some(""), None, Some(" ")],
        )
        .into_column(),
        Series::new(
            "수정주가(원)".into(),
            vec![Some("25,200"), Some("24,040"), None, None],
        )
        .into_column(),
        Series::new("거래량(주)".into(), vec![Some("1,000"), None, None, Some("-")])
            .into_column(),
    ])
    .unwrap()
}

fn groups(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(name, items)| {
            (
                (*name).to_string(),
                items.iter().map(|item| (*item).to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn unit_scaling_renames_and_records() {
    let pipeline = TransformPipeline::new(
        PipelineOptions::default(),
        groups(&[("default", &["매출액(억원)", "수정주가(원)", "거래량(주)"])]),
    );
    let result = pipeline.run(&canonical(), Some(keys().as_slice())).unwrap();

    assert_eq!(
        result.unit_info.get("매출액(억원)"),
        Some(&UnitInfo {
            unit: "억원".to_string(),
            multiplier: 100_000_000
        })
    );
    let table = &result.tables["default"];
    assert_eq!(
        column_names(table),
        vec!["코드", "코드명", "date", "매출액(원)", "수정주가(원)", "거래량(주)"]
    );
    let sales = table.column("매출액(원)").unwrap().f64().unwrap();
    assert_eq!(sales.get(0), Some(10_000_000_000.0));
    let price = table.column("수정주가(원)").unwrap().f64().unwrap();
    assert_eq!(price.get(1), Some(24_040.0));
}

#[test]
fn empty_entity_is_dropped() {
    let pipeline = TransformPipeline::new(
        PipelineOptions::default(),
        groups(&[("default", &["매출액(억원)", "수정주가(원)", "거래량(주)"])]),
    );
    let result = pipeline.run(&canonical(), Some(keys().as_slice())).unwrap();

    let stats = result.drop_result.unwrap();
    assert_eq!(stats.entities_total, 2);
    assert_eq!(stats.entities_dropped, 1);

    let table = &result.tables["default"];
    assert_eq!(table.height(), 2);
    let codes = table.column("코드").unwrap().str().unwrap();
    assert!(codes.into_iter().all(|code| code == Some("A001")));
}

#[test]
fn disabled_stages_are_skipped() {
    let options = PipelineOptions {
        normalize_units: false,
        drop_empty_entities: false,
        ..PipelineOptions::default()
    };
    let pipeline = TransformPipeline::new(options, groups(&[("raw", &["매출액(억원)"])]));
    let result = pipeline.run(&canonical(), Some(keys().as_slice())).unwrap();

    assert!(result.unit_info.is_empty());
    assert!(result.drop_result.is_none());
    let table = &result.tables["raw"];
    assert_eq!(table.height(), 4);
    let sales = table.column("매출액(억원)").unwrap().f64().unwrap();
    assert_eq!(sales.get(0), Some(100.0));
}

#[test]
fn groups_are_split_and_empty_groups_omitted() {
    let pipeline = TransformPipeline::new(
        PipelineOptions::default(),
        groups(&[
            ("financials", &["매출액(억원)"]),
            ("market", &["수정주가(원)", "거래량(주)"]),
            ("stale", &["영업이익(억원)"]),
        ]),
    );
    let result = pipeline.run(&canonical(), Some(keys().as_slice())).unwrap();

    assert_eq!(
        result.tables.keys().cloned().collect::<Vec<_>>(),
        vec!["financials", "market"]
    );
    assert_eq!(
        column_names(&result.tables["financials"]),
        vec!["코드", "코드명", "date", "매출액(원)"]
    );
}

#[test]
fn default_key_columns_are_detected() {
    let pipeline =
        TransformPipeline::new(PipelineOptions::default(), groups(&[("t", &["거래량(주)"])]));
    let result = pipeline.run(&canonical(), None).unwrap();
    let table = &result.tables["t"];
    assert_eq!(table.column("코드명").unwrap().dtype(), &DataType::String);
    assert_eq!(column_names(table), vec!["코드", "코드명", "date", "거래량(주)"]);
}

#[test]
fn input_table_is_not_mutated() {
    let df = canonical();
    let pipeline = TransformPipeline::new(
        PipelineOptions::default(),
        groups(&[("default", &["매출액(억원)"])]),
    );
    pipeline.run(&df, Some(keys().as_slice())).unwrap();
    assert_eq!(df.height(), 4);
    assert!(df.column("매출액(억원)").is_ok());
    assert_eq!(df.column("매출액(억원)").unwrap().dtype(), &DataType::String);
}

#[test]
fn base_unit_columns_keep_their_name() {
    let pipeline = TransformPipeline::new(
        PipelineOptions::default(),
        groups(&[("t", &["수정주가(원)"])]),
    );
    let first = pipeline.run(&canonical(), Some(keys().as_slice())).unwrap();
    assert_eq!(first.unit_info["수정주가(원)"].multiplier, 1);
    assert!(column_names(&first.tables["t"]).contains(&"수정주가(원)".to_string()));
}

fn with_separators(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::new();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

proptest! {
    #[test]
    fn separated_numbers_parse_exactly(value in 0u64..10_000_000_000, pad in 0usize..3) {
        let cell = format!("{}{}{}", " ".repeat(pad), with_separators(value), " ".repeat(pad));
        let df = DataFrame::new(vec![
            Series::new("값".into(), vec![Some(cell)]).into_column(),
        ]).unwrap();
        let parsed = parse_numbers(&df, &[]).unwrap();
        let values = parsed.column("값").unwrap().f64().unwrap();
        prop_assert_eq!(values.get(0), Some(value as f64));
    }

    #[test]
    fn non_numeric_text_becomes_missing(text in "[가-힣]{0,8}") {
        let df = DataFrame::new(vec![
            Series::new("값".into(), vec![Some(text)]).into_column(),
        ]).unwrap();
        let parsed = parse_numbers(&df, &[]).unwrap();
        prop_assert_eq!(parsed.column("값").unwrap().f64().unwrap().get(0), None);
    }

    #[test]
    fn entity_retained_iff_any_value(
        rows in prop::collection::vec((0u8..5, prop::option::of(-1e6f64..1e6)), 0..40)
    ) {
        let entities: Vec<String> = rows.iter().map(|(e, _)| format!("A{e:03}")).collect();
        let values: Vec<Option<f64>> = rows.iter().map(|(_, v)| *v).collect();
        let df = DataFrame::new(vec![
            Series::new("코드".into(), entities.clone()).into_column(),
            Series::new("값".into(), values.clone()).into_column(),
        ]).unwrap();

        let (out, stats) = drop_empty_entities(&df, "코드", None).unwrap();

        let all: BTreeSet<&String> = entities.iter().collect();
        let with_data: BTreeSet<&String> = entities
            .iter()
            .zip(&values)
            .filter(|(_, v)| v.is_some())
            .map(|(e, _)| e)
            .collect();
        let kept: BTreeSet<String> = out
            .column("코드")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(ToString::to_string)
            .collect();

        prop_assert_eq!(stats.entities_total, all.len());
        prop_assert_eq!(stats.entities_total, stats.entities_retained() + stats.entities_dropped);
        prop_assert_eq!(kept.len(), with_data.len());
        prop_assert!(with_data.iter().all(|e| kept.contains(*e)));
    }

    #[test]
    fn split_value_columns_are_configured_and_present(
        mask in prop::collection::vec(any::<bool>(), 4),
        split in prop::collection::vec(0usize..3, 4),
    ) {
        let candidates = ["가(원)", "나(주)", "다", "라(%)"];
        let mut columns = vec![Series::new("코드".into(), &["A001"]).into_column()];
        for (name, present) in candidates.iter().zip(&mask) {
            if *present {
                columns.push(Series::new((*name).into(), &[1.0]).into_column());
            }
        }
        let df = DataFrame::new(columns).unwrap();

        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, group) in candidates.iter().zip(&split) {
            groups.entry(format!("g{group}")).or_default().push((*name).to_string());
        }
        let keys = vec!["코드".to_string()];
        let tables = split_tables(&df, &groups, &keys).unwrap();

        let produced: BTreeSet<String> = tables
            .values()
            .flat_map(column_names)
            .filter(|name| name != "코드")
            .collect();
        let expected: BTreeSet<String> = candidates
            .iter()
            .zip(&mask)
            .filter(|(_, present)| **present)
            .map(|(name, _)| (*name).to_string())
            .collect();
        prop_assert_eq!(produced, expected);
        prop_assert!(tables.values().all(|table| table.width() > 1));
    }
}
