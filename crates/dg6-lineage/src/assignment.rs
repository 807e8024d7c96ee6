//! Derivations from the configuration and pipeline output.

use std::collections::BTreeMap;

use dg6_model::{IngestConfig, UnitInfo};
use dg6_transform::{DropStats, PipelineResult, normalized_name};

/// Maps each configured item, under its post-normalization name, to its table.
///
/// An item listed in several groups maps to the last one in name order.
pub fn build_table_assignment(
    config: &IngestConfig,
    unit_info: &BTreeMap<String, UnitInfo>,
) -> BTreeMap<String, String> {
    let mut assignment = BTreeMap::new();
    for (table, items) in &config.tables {
        for item in items {
            assignment.insert(normalized_name(item, unit_info), table.clone());
        }
    }
    assignment
}

/// Entity counts per configured table.
///
/// Elimination runs before splitting, so every table shares the same pair;
/// it is `(0, 0)` when elimination was disabled.
pub fn build_entity_stats(
    result: &PipelineResult,
    config: &IngestConfig,
) -> BTreeMap<String, DropStats> {
    let stats = result.drop_result.unwrap_or_default();
    config
        .tables
        .keys()
        .map(|table| (table.clone(), stats))
        .collect()
}
