use std::path::PathBuf;

use dg6_transform::DropStats;

/// One written output table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    pub path: PathBuf,
}

/// What a build produced.
#[derive(Debug, Clone, Default)]
pub struct BuildResult {
    pub tables: Vec<TableSummary>,
    /// `None` when empty-entity elimination was disabled.
    pub drop_result: Option<DropStats>,
    pub meta_rows: usize,
    /// Every written file, the meta table last.
    pub written: Vec<PathBuf>,
}

/// Outcome of `init`, `ingest` or `open`.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub config_path: PathBuf,
    pub source: String,
    pub detected_format: String,
    pub output_dir: PathBuf,
    /// `None` when no build ran (`--no-run`, or outputs already up to date).
    pub build: Option<BuildResult>,
}
