//! Run orchestration.
//!
//! The workflows share one build sequence:
//! 1. **Transform**: number parsing, unit normalization, empty-entity drop, split
//! 2. **Lineage**: table assignment, entity stats, `_meta` rows
//! 3. **Export**: every table plus `_meta`, only after 1 and 2 succeed
//!
//! Detection or validation failures abort before anything is written.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use dg6_ingest::{Detection, LayoutRegistry, ParseResult, detect_format, parse_file};
use dg6_lineage::{build_entity_stats, build_meta_table, build_table_assignment};
use dg6_model::IngestConfig;
use dg6_output::{META_TABLE_NAME, export_tables};
use dg6_transform::TransformPipeline;

use crate::config_io::{config_path_for_output_dir, is_config_path, load_config, save_config};
use crate::types::{BuildResult, RunReport, TableSummary};

/// Builds the layout registry from a directory, or the built-in set.
pub fn load_registry(layouts_dir: Option<&Path>) -> Result<LayoutRegistry> {
    let registry = match layouts_dir {
        Some(dir) => LayoutRegistry::load_dir(dir)
            .with_context(|| format!("load layouts from {}", dir.display()))?,
        None => LayoutRegistry::builtin().context("load built-in layouts")?,
    };
    anyhow::ensure!(!registry.is_empty(), "no layouts registered");
    Ok(registry)
}

/// Detects the layout of a source file and parses it.
pub fn detect_and_parse(
    path: &Path,
    registry: &LayoutRegistry,
) -> Result<(Detection, ParseResult)> {
    let detection = detect_format(path, registry)
        .with_context(|| format!("detect format of {}", path.display()))?;
    info!(
        format_name = %detection.layout.format_name,
        parser = %detection.parser,
        "Detected format"
    );
    let parsed =
        parse_file(path, &detection).with_context(|| format!("parse {}", path.display()))?;
    info!(
        rows = parsed.table.height(),
        items = parsed.items.len(),
        key_columns = ?parsed.key_columns,
        "Parsed source"
    );
    Ok((detection, parsed))
}

#[derive(Debug, Clone)]
pub struct InitOptions {
    pub config_path: PathBuf,
    pub output_dir: Option<String>,
    /// Build outputs right after writing the config.
    pub run: bool,
}

/// First run: detect, parse, write a default config and optionally build.
///
/// A source without any value items fails here, before the config is saved.
pub fn init(input: &Path, registry: &LayoutRegistry, options: &InitOptions) -> Result<RunReport> {
    let span = info_span!("init", input = %input.display());
    let _guard = span.enter();

    let (_, parsed) = detect_and_parse(input, registry)?;
    let config = IngestConfig::generate_default(
        input.to_string_lossy(),
        parsed.format_name.clone(),
        parsed.metadata.clone(),
        parsed.item_names(),
        options.output_dir.clone(),
    );
    config
        .validate()
        .with_context(|| format!("no items found in {}", input.display()))?;
    save_config(&config, &options.config_path)?;

    let build = if options.run {
        Some(run_pipeline_and_export(&config, &parsed)?)
    } else {
        info!("Skipping build (--no-run)");
        None
    };
    Ok(report(&config, &options.config_path, build))
}

/// Later runs: load and validate the config, then rebuild every output.
pub fn ingest(config_path: &Path, registry: &LayoutRegistry) -> Result<RunReport> {
    let span = info_span!("ingest", config = %config_path.display());
    let _guard = span.enter();

    let config = load_config(config_path)?;
    info!(
        format = %config.source.detected_format,
        tables = config.tables.len(),
        "Loaded config"
    );
    let source = Path::new(&config.source.input_path);
    let (_, parsed) = detect_and_parse(source, registry)?;

    let available: BTreeSet<String> = parsed.item_names().into_iter().collect();
    config
        .validate_against_items(&available)
        .with_context(|| format!("validate {} against the source", config_path.display()))?;

    let build = run_pipeline_and_export(&config, &parsed)?;
    Ok(report(&config, config_path, Some(build)))
}

#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    pub output_dir: Option<String>,
    /// Defaults to `<output_dir>.toml`.
    pub config_path: Option<PathBuf>,
    pub run: bool,
    /// Rebuild even when outputs exist.
    pub force: bool,
}

/// Idempotent entry point for a source file or a config file.
///
/// A config path is only loaded. For a source file, an existing config whose
/// outputs are all present is reused without rebuilding.
pub fn open(path: &Path, registry: &LayoutRegistry, options: &OpenOptions) -> Result<RunReport> {
    if is_config_path(path) {
        let config = load_config(path)?;
        return Ok(report(&config, path, None));
    }

    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| "outputs/".to_string());
    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(|| config_path_for_output_dir(&output_dir));

    if !options.force && config_path.exists() {
        let config = load_config(&config_path)?;
        if outputs_exist(&config) {
            info!(
                config = %config_path.display(),
                output_dir = %config.output.output_dir,
                "Outputs already exist, skipping build"
            );
            return Ok(report(&config, &config_path, None));
        }
        info!("Config exists but outputs are missing, rebuilding");
    }

    init(
        path,
        registry,
        &InitOptions {
            config_path,
            output_dir: Some(output_dir),
            run: options.run,
        },
    )
}

/// True when every configured table and the meta table exist on disk.
pub fn outputs_exist(config: &IngestConfig) -> bool {
    let dir = Path::new(&config.output.output_dir);
    if !dir.is_dir() {
        return false;
    }
    let ext = config.output.output_format.extension();
    config
        .tables
        .keys()
        .map(String::as_str)
        .chain(std::iter::once(META_TABLE_NAME))
        .all(|name| dir.join(format!("{name}.{ext}")).is_file())
}

/// Transforms, builds lineage and exports.
pub fn run_pipeline_and_export(config: &IngestConfig, parsed: &ParseResult) -> Result<BuildResult> {
    let pipeline = TransformPipeline::from_config(config);
    let key_columns = (!parsed.key_columns.is_empty()).then_some(parsed.key_columns.as_slice());
    let result = pipeline
        .run(&parsed.table, key_columns)
        .context("transform pipeline")?;

    let assignment = build_table_assignment(config, &result.unit_info);
    let entity_stats = build_entity_stats(&result, config);
    let meta = build_meta_table(
        config,
        &parsed.items,
        parsed.source_last_updated.as_deref(),
        &assignment,
        &result.unit_info,
        &entity_stats,
    );
    let meta_frame = meta.to_dataframe().context("build meta table")?;

    let output_dir = Path::new(&config.output.output_dir);
    let written = export_tables(
        &result.tables,
        &meta_frame,
        output_dir,
        config.output.output_format,
    )
    .with_context(|| format!("export to {}", output_dir.display()))?;
    info!(files = written.len(), "Pipeline complete");

    let tables = result
        .tables
        .iter()
        .zip(&written)
        .map(|((name, table), path)| TableSummary {
            name: name.clone(),
            rows: table.height(),
            columns: table.width(),
            path: path.clone(),
        })
        .collect();
    Ok(BuildResult {
        tables,
        drop_result: result.drop_result,
        meta_rows: meta.len(),
        written,
    })
}

fn report(config: &IngestConfig, config_path: &Path, build: Option<BuildResult>) -> RunReport {
    RunReport {
        config_path: config_path.to_path_buf(),
        source: config.source.input_path.clone(),
        detected_format: config.source.detected_format.clone(),
        output_dir: PathBuf::from(&config.output.output_dir),
        build,
    }
}
