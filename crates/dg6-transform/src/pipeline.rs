//! Transform pipeline orchestration.
//!
//! Runs the four stages in order over a parsed table:
//!
//! 1. number parsing (always)
//! 2. unit normalization (`normalize_units`)
//! 3. empty-entity elimination (`drop_empty_entities`)
//! 4. table splitting (always)
//!
//! The pipeline holds only configuration, so one instance can process any
//! number of tables independently.

use std::collections::BTreeMap;

use dg6_model::{DEFAULT_ENTITY_COLUMN, IngestConfig, OutputConfig, UnitInfo};
use polars::prelude::DataFrame;

use crate::empty::{DropStats, drop_empty_entities};
use crate::error::Result;
use crate::frame::{column_names, is_key};
use crate::numbers::parse_numbers;
use crate::splitter::split_tables;
use crate::units::{normalize_units, normalized_name};

/// Key columns assumed when the caller provides none.
pub const DEFAULT_KEY_COLUMNS: [&str; 3] = ["코드", "코드명", "date"];

/// Stage toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub normalize_units: bool,
    pub drop_empty_entities: bool,
    pub entity_column: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            normalize_units: true,
            drop_empty_entities: true,
            entity_column: DEFAULT_ENTITY_COLUMN.to_string(),
        }
    }
}

impl From<&OutputConfig> for PipelineOptions {
    fn from(output: &OutputConfig) -> Self {
        Self {
            normalize_units: output.normalize_units,
            drop_empty_entities: output.drop_empty_entities,
            entity_column: output.entity_column.clone(),
        }
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Split tables by group name. Groups with no present columns are absent.
    pub tables: BTreeMap<String, DataFrame>,
    /// Unit record per monetary column, keyed by pre-normalization name.
    /// Empty when unit normalization is disabled.
    pub unit_info: BTreeMap<String, UnitInfo>,
    /// `None` when empty-entity elimination is disabled.
    pub drop_result: Option<DropStats>,
}

#[derive(Debug, Clone)]
pub struct TransformPipeline {
    options: PipelineOptions,
    groups: BTreeMap<String, Vec<String>>,
}

impl TransformPipeline {
    pub fn new(options: PipelineOptions, groups: BTreeMap<String, Vec<String>>) -> Self {
        Self { options, groups }
    }

    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(PipelineOptions::from(&config.output), config.tables.clone())
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Runs every stage over `df`, which is left unchanged.
    ///
    /// `key_columns` defaults to whichever of `코드`, `코드명` and `date`
    /// exist in `df`.
    pub fn run(&self, df: &DataFrame, key_columns: Option<&[String]>) -> Result<PipelineResult> {
        let key_columns: Vec<String> = match key_columns {
            Some(keys) => keys.to_vec(),
            None => {
                let names = column_names(df);
                DEFAULT_KEY_COLUMNS
                    .iter()
                    .filter(|key| names.iter().any(|name| name == *key))
                    .map(ToString::to_string)
                    .collect()
            }
        };

        let value_count = column_names(df)
            .iter()
            .filter(|name| !is_key(name, &key_columns))
            .count();
        tracing::info!(columns = value_count, "Step 1/4: Parsing numbers");
        let mut working = parse_numbers(df, &key_columns)?;

        let mut unit_info = BTreeMap::new();
        if self.options.normalize_units {
            tracing::info!("Step 2/4: Normalizing units");
            let (normalized, info) = normalize_units(&working, &key_columns)?;
            let scaled = info.values().filter(|unit| unit.is_scaled()).count();
            tracing::info!(monetary = info.len(), scaled, "Unit normalization complete");
            working = normalized;
            unit_info = info;
        } else {
            tracing::info!("Step 2/4: Unit normalization skipped (disabled in config)");
        }

        let mut drop_result = None;
        if self.options.drop_empty_entities {
            tracing::info!(
                entity_column = %self.options.entity_column,
                "Step 3/4: Dropping empty entities"
            );
            let value_columns: Vec<String> = column_names(&working)
                .into_iter()
                .filter(|name| !is_key(name, &key_columns) && *name != self.options.entity_column)
                .collect();
            let (cleaned, stats) = drop_empty_entities(
                &working,
                &self.options.entity_column,
                Some(value_columns.as_slice()),
            )?;
            tracing::info!(
                entities_total = stats.entities_total,
                entities_dropped = stats.entities_dropped,
                "Empty-entity elimination complete"
            );
            working = cleaned;
            drop_result = Some(stats);
        } else {
            tracing::info!("Step 3/4: Empty-entity drop skipped (disabled in config)");
        }

        let groups = self.resolve_table_groups(&unit_info);
        tracing::info!(groups = groups.len(), "Step 4/4: Splitting tables");
        let tables = split_tables(&working, &groups, &key_columns)?;

        Ok(PipelineResult {
            tables,
            unit_info,
            drop_result,
        })
    }

    /// Table groups with every scaled item replaced by its renamed column.
    pub fn resolve_table_groups(
        &self,
        unit_info: &BTreeMap<String, UnitInfo>,
    ) -> BTreeMap<String, Vec<String>> {
        self.groups
            .iter()
            .map(|(table, items)| {
                let resolved = items
                    .iter()
                    .map(|item| normalized_name(item, unit_info))
                    .collect();
                (table.clone(), resolved)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline(groups: &[(&str, &[&str])]) -> TransformPipeline {
        let groups: BTreeMap<String, Vec<String>> = groups
            .iter()
            .map(|(name, items)| {
                (
                    (*name).to_string(),
                    items.iter().map(|item| (*item).to_string()).collect(),
                )
            })
            .collect();
        TransformPipeline::new(PipelineOptions::default(), groups)
    }

    #[test]
    fn test_resolve_table_groups_follows_renames() {
        let pipeline = pipeline(&[("fin", &["매출액(억원)", "주가(원)", "거래량(주)"])]);
        let unit_info = BTreeMap::from([
            (
                "매출액(억원)".to_string(),
                UnitInfo {
                    unit: "억원".to_string(),
                    multiplier: 100_000_000,
                },
            ),
            (
                "주가(원)".to_string(),
                UnitInfo {
                    unit: "원".to_string(),
                    multiplier: 1,
                },
            ),
        ]);
        let resolved = pipeline.resolve_table_groups(&unit_info);
        assert_eq!(resolved["fin"], vec!["매출액(원)", "주가(원)", "거래량(주)"]);
    }

    #[test]
    fn test_resolve_without_unit_info_is_identity() {
        let pipeline = pipeline(&[("a", &["x(억원)"])]);
        assert_eq!(pipeline.resolve_table_groups(&BTreeMap::new())["a"], vec!["x(억원)"]);
    }

    #[test]
    fn test_options_from_output_config() {
        let output = OutputConfig {
            normalize_units: false,
            entity_column: "ETF코드".to_string(),
            ..OutputConfig::default()
        };
        let options = PipelineOptions::from(&output);
        assert!(!options.normalize_units);
        assert!(options.drop_empty_entities);
        assert_eq!(options.entity_column, "ETF코드");
    }
}
