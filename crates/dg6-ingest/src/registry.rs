//! Layout registry.
//!
//! Layouts are loaded once, sorted by category priority and then handed to
//! the detector explicitly. The built-in set is embedded at compile time
//! with `include_str!()`; a directory of `*.toml` files can replace it.

use std::collections::BTreeMap;
use std::path::Path;

use dg6_model::{Layout, ParseMode, SettingValue};

use crate::error::{IngestError, Result};

/// Built-in layouts as `(file name, TOML text)`.
pub const BUILTIN_LAYOUTS: &[(&str, &str)] = &[
    (
        "timeseries_wide.toml",
        include_str!("../layouts/timeseries_wide.toml"),
    ),
    ("misc_etf.toml", include_str!("../layouts/misc_etf.toml")),
];

/// Registered layouts in detection order.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: Vec<Layout>,
}

impl LayoutRegistry {
    /// Builds a registry from already-decoded layouts.
    pub fn new(mut layouts: Vec<Layout>) -> Self {
        // Stable sort keeps file order within a category.
        layouts.sort_by_key(Layout::priority);
        Self { layouts }
    }

    /// The layouts shipped with this crate.
    pub fn builtin() -> Result<Self> {
        let mut layouts = Vec::with_capacity(BUILTIN_LAYOUTS.len());
        for &(name, text) in BUILTIN_LAYOUTS {
            let layout = Layout::from_toml_str(text)
                .map_err(|source| IngestError::BuiltinLayout { name, source })?;
            layouts.push(layout);
        }
        tracing::debug!(count = layouts.len(), "Loaded built-in layouts");
        Ok(Self::new(layouts))
    }

    /// Loads every `*.toml` layout in `dir`.
    ///
    /// A malformed file is skipped with a warning; only an unreadable
    /// directory is an error.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut paths = Vec::new();
        for entry_result in entries {
            let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
                path: dir.to_path_buf(),
                source: e,
            })?;
            let path = entry.path();
            let is_toml = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
            if path.is_file() && is_toml {
                paths.push(path);
            }
        }
        paths.sort();

        let mut layouts = Vec::with_capacity(paths.len());
        for path in paths {
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "Skipping unreadable layout");
                    continue;
                }
            };
            match Layout::from_toml_str(&text) {
                Ok(layout) => {
                    tracing::debug!(
                        format_name = %layout.format_name,
                        path = %path.display(),
                        "Loaded layout"
                    );
                    layouts.push(layout);
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "Skipping malformed layout");
                }
            }
        }

        tracing::info!(dir = %dir.display(), count = layouts.len(), "Loaded layouts");
        Ok(Self::new(layouts))
    }

    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn get(&self, format_name: &str) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.format_name == format_name)
    }

    /// Number of leading rows detection must read to cover every layout.
    pub fn rows_needed(&self) -> usize {
        self.layouts
            .iter()
            .map(Layout::data_header_row)
            .max()
            .unwrap_or(0)
            + 2
    }
}

/// Reads every setting a layout declares out of the leading rows.
///
/// Out-of-range cells read as empty. An empty cell is absent for raw and
/// strip-prefix settings; a cell holding only the prefix strips to empty
/// text. Presence settings are always a flag.
pub fn extract_settings(
    layout: &Layout,
    rows: &[Vec<String>],
) -> BTreeMap<String, Option<SettingValue>> {
    layout
        .settings
        .iter()
        .map(|(key, spec)| {
            let raw = rows
                .get(spec.row)
                .and_then(|row| row.get(spec.col))
                .map(|cell| cell.trim())
                .unwrap_or("");
            let value = match &spec.parse {
                ParseMode::Presence => Some(SettingValue::Flag(!raw.is_empty())),
                ParseMode::StripPrefix(_) if raw.is_empty() => None,
                ParseMode::StripPrefix(prefix) => {
                    let stripped = raw.strip_prefix(prefix.as_str()).unwrap_or(raw).trim();
                    Some(SettingValue::Text(stripped.to_string()))
                }
                ParseMode::Raw => non_empty(raw),
            };
            (key.clone(), value)
        })
        .collect()
}

fn non_empty(value: &str) -> Option<SettingValue> {
    if value.is_empty() {
        None
    } else {
        Some(SettingValue::Text(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg6_model::FormatCategory;
    use tempfile::TempDir;

    fn rows(lines: &[&[&str]]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|cells| cells.iter().map(|c| (*c).to_string()).collect())
            .collect()
    }

    #[test]
    fn test_builtin_layouts_sorted_by_priority() {
        let registry = LayoutRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.layouts()[0].format_name, "timeseries_wide");
        assert_eq!(registry.layouts()[1].format_name, "misc_etf");
        assert_eq!(registry.rows_needed(), 10);
        assert!(registry.get("misc_etf").is_some());
    }

    #[test]
    fn test_load_dir_skips_malformed_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a_misc.toml"), BUILTIN_LAYOUTS[1].1).unwrap();
        std::fs::write(dir.path().join("b_series.toml"), BUILTIN_LAYOUTS[0].1).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "format_name = ").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = LayoutRegistry::load_dir(dir.path()).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.layouts()[0].format_category,
            FormatCategory::Timeseries
        );
        assert_eq!(registry.layouts()[1].format_category, FormatCategory::Misc);
    }

    #[test]
    fn test_load_dir_missing_directory() {
        let result = LayoutRegistry::load_dir(Path::new("/nonexistent/layouts"));
        assert!(matches!(result, Err(IngestError::DirectoryRead { .. })));
    }

    #[test]
    fn test_extract_settings_parse_modes() {
        let registry = LayoutRegistry::builtin().unwrap();
        let layout = registry.get("timeseries_wide").unwrap();
        let head = rows(&[
            &["Refresh", "Last Updated: 2026-02-07 10:12:01"],
            &["달력기준"],
            &["코드 포트폴리오", "all"],
            &["출력주기", "일간"],
            &["비영업일", "제외"],
            &["주말포함", ""],
            &["통화", "원화"],
            &["기간", "20160101"],
        ]);
        let settings = extract_settings(layout, &head);

        assert_eq!(
            settings["last_updated"],
            Some(SettingValue::Text("2026-02-07 10:12:01".to_string()))
        );
        assert_eq!(settings["calendar_basis"], Some(SettingValue::Flag(true)));
        assert_eq!(
            settings["frequency"],
            Some(SettingValue::Text("일간".to_string()))
        );
        assert_eq!(settings["include_weekends"], None);
        assert_eq!(settings["period_end"], None);
    }

    #[test]
    fn test_extract_settings_prefix_only_cell_is_empty_text() {
        let registry = LayoutRegistry::builtin().unwrap();
        let layout = registry.get("timeseries_wide").unwrap();
        let settings = extract_settings(layout, &rows(&[&["Refresh", "Last Updated:  "]]));
        assert_eq!(
            settings["last_updated"],
            Some(SettingValue::Text(String::new()))
        );
    }

    #[test]
    fn test_extract_settings_presence_is_false_when_blank() {
        let registry = LayoutRegistry::builtin().unwrap();
        let layout = registry.get("timeseries_wide").unwrap();
        let settings = extract_settings(layout, &rows(&[&["Refresh"], &[""]]));
        assert_eq!(settings["calendar_basis"], Some(SettingValue::Flag(false)));
        assert_eq!(settings["last_updated"], None);
    }
}
