//! Reading and writing the run configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dg6_model::IngestConfig;

/// Configuration file used when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "fnconfig.toml";

const CONFIG_HEADER: &str = "\
# DataGuide 6 ingestion configuration.
#
# Generated on first run. Edit [tables] to regroup items into output tables,
# then run `ingest` to rebuild every output from the source file.

";

/// Loads a configuration and runs the structural validation pass.
pub fn load_config(path: &Path) -> Result<IngestConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config = IngestConfig::from_toml_str(&text)
        .with_context(|| format!("parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validate config {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        tables = config.tables.len(),
        items = config.referenced_item_count(),
        "Loaded config"
    );
    Ok(config)
}

/// Writes a configuration with an explanatory header, creating parent directories.
pub fn save_config(config: &IngestConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let body = config.to_toml_string().context("serialize config")?;
    fs::write(path, format!("{CONFIG_HEADER}{body}"))
        .with_context(|| format!("write config {}", path.display()))?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

/// Config path placed next to an output directory: `outputs/ohlcv` gives
/// `outputs/ohlcv.toml`.
pub fn config_path_for_output_dir(output_dir: &str) -> PathBuf {
    let trimmed = output_dir.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        return PathBuf::from(DEFAULT_CONFIG_FILE);
    }
    PathBuf::from(format!("{trimmed}.toml"))
}

/// True when the path names a configuration file rather than a source export.
pub fn is_config_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_for_output_dir() {
        assert_eq!(
            config_path_for_output_dir("outputs/ohlcv"),
            PathBuf::from("outputs/ohlcv.toml")
        );
        assert_eq!(
            config_path_for_output_dir("outputs/"),
            PathBuf::from("outputs.toml")
        );
        assert_eq!(config_path_for_output_dir("/"), PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn test_is_config_path() {
        assert!(is_config_path(Path::new("outputs/ohlcv.toml")));
        assert!(is_config_path(Path::new("FNCONFIG.TOML")));
        assert!(!is_config_path(Path::new("inputs/ohlcv.csv")));
    }
}
