//! The `_meta` lineage table.
//!
//! One row per discovered item records where the item came from, how it was
//! transformed and which table it ended up in. The column order is fixed
//! and the schema is the same whether or not there are rows.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use dg6_model::{IngestConfig, ItemInfo, UnitInfo, normalize_column_name};
use dg6_transform::DropStats;
use polars::prelude::*;

use crate::error::Result;
use crate::hash::source_hash;

/// Column order of the meta table.
pub const META_COLUMNS: [&str; 20] = [
    "table_name",
    "source_file",
    "source_hash",
    "source_last_updated",
    "detected_format",
    "item_code",
    "item_name",
    "item_name_normalized",
    "type",
    "aggregation_period",
    "frequency",
    "period_start",
    "period_end",
    "unit_original",
    "unit_multiplier",
    "non_business_days",
    "include_weekends",
    "entities_total",
    "entities_dropped",
    "processed_at",
];

/// One lineage row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaRow {
    /// Empty when the item is in no configured table.
    pub table_name: String,
    pub source_file: String,
    /// Empty when the source could not be hashed.
    pub source_hash: String,
    pub source_last_updated: Option<String>,
    pub detected_format: String,
    pub item_code: Option<String>,
    pub item_name: String,
    pub item_name_normalized: String,
    pub item_type: Option<String>,
    pub aggregation_period: Option<String>,
    pub frequency: Option<String>,
    pub period_start: Option<String>,
    pub period_end: Option<String>,
    pub unit_original: Option<String>,
    pub unit_multiplier: i64,
    pub non_business_days: Option<String>,
    pub include_weekends: Option<String>,
    pub entities_total: i64,
    pub entities_dropped: i64,
    pub processed_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaTable {
    pub rows: Vec<MetaRow>,
}

impl MetaTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the table with [`META_COLUMNS`] in order.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let rows = &self.rows;
        let columns = vec![
            text(0, rows.iter().map(|r| r.table_name.clone()).collect()),
            text(1, rows.iter().map(|r| r.source_file.clone()).collect()),
            text(2, rows.iter().map(|r| r.source_hash.clone()).collect()),
            optional(3, rows.iter().map(|r| r.source_last_updated.clone()).collect()),
            text(4, rows.iter().map(|r| r.detected_format.clone()).collect()),
            optional(5, rows.iter().map(|r| r.item_code.clone()).collect()),
            text(6, rows.iter().map(|r| r.item_name.clone()).collect()),
            text(7, rows.iter().map(|r| r.item_name_normalized.clone()).collect()),
            optional(8, rows.iter().map(|r| r.item_type.clone()).collect()),
            optional(9, rows.iter().map(|r| r.aggregation_period.clone()).collect()),
            optional(10, rows.iter().map(|r| r.frequency.clone()).collect()),
            optional(11, rows.iter().map(|r| r.period_start.clone()).collect()),
            optional(12, rows.iter().map(|r| r.period_end.clone()).collect()),
            optional(13, rows.iter().map(|r| r.unit_original.clone()).collect()),
            integer(14, rows.iter().map(|r| r.unit_multiplier).collect()),
            optional(15, rows.iter().map(|r| r.non_business_days.clone()).collect()),
            optional(16, rows.iter().map(|r| r.include_weekends.clone()).collect()),
            integer(17, rows.iter().map(|r| r.entities_total).collect()),
            integer(18, rows.iter().map(|r| r.entities_dropped).collect()),
            text(19, rows.iter().map(|r| r.processed_at.clone()).collect()),
        ];
        Ok(DataFrame::new(columns)?)
    }
}

fn text(idx: usize, values: Vec<String>) -> Column {
    Series::new(META_COLUMNS[idx].into(), values).into_column()
}

fn optional(idx: usize, values: Vec<Option<String>>) -> Column {
    Series::new(META_COLUMNS[idx].into(), values).into_column()
}

fn integer(idx: usize, values: Vec<i64>) -> Column {
    Series::new(META_COLUMNS[idx].into(), values).into_column()
}

/// Builds one meta row per item.
///
/// `table_assignment` is keyed by post-normalization item name and
/// `unit_info` by original column name. Items in no table get an empty table
/// name and zero entity counts.
pub fn build_meta_table(
    config: &IngestConfig,
    items: &[ItemInfo],
    source_last_updated: Option<&str>,
    table_assignment: &BTreeMap<String, String>,
    unit_info: &BTreeMap<String, UnitInfo>,
    entity_stats: &BTreeMap<String, DropStats>,
) -> MetaTable {
    let input_path = Path::new(&config.source.input_path);
    let source_file = input_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.source.input_path.clone());
    let source_hash = source_hash(input_path).unwrap_or_default();
    let processed_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let metadata = &config.metadata;

    let rows = items
        .iter()
        .map(|item| {
            let unit = unit_info.get(&item.item_name);
            let item_name_normalized = match unit {
                Some(unit) if unit.is_scaled() => normalize_column_name(&item.item_name),
                _ => item.item_name.clone(),
            };
            let table_name = table_assignment
                .get(&item_name_normalized)
                .cloned()
                .unwrap_or_default();
            let stats = entity_stats.get(&table_name).copied().unwrap_or_default();

            MetaRow {
                table_name,
                source_file: source_file.clone(),
                source_hash: source_hash.clone(),
                source_last_updated: source_last_updated.map(ToString::to_string),
                detected_format: config.source.detected_format.clone(),
                item_code: item.item_code.clone(),
                item_name: item.item_name.clone(),
                item_name_normalized,
                item_type: item.item_type.clone(),
                aggregation_period: item.aggregation_period.clone(),
                frequency: metadata.frequency.clone(),
                period_start: metadata.period_start.clone(),
                period_end: metadata.period_end.clone(),
                unit_original: unit.map(|u| u.unit.clone()),
                unit_multiplier: unit.map_or(1, |u| u.multiplier),
                non_business_days: metadata.non_business_days.clone(),
                include_weekends: metadata.include_weekends.clone(),
                entities_total: count(stats.entities_total),
                entities_dropped: count(stats.entities_dropped),
                processed_at: processed_at.clone(),
            }
        })
        .collect();

    MetaTable { rows }
}

fn count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
