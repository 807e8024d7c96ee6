use serde::{Deserialize, Serialize};

/// Item-level attributes discovered in a source file.
///
/// Time-series exports carry every attribute on each data row. Misc exports
/// only expose column headers, so just `item_name` is populated there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub item_code: Option<String>,
    /// Unique per file; doubles as the value column name in the canonical table.
    pub item_name: String,
    pub item_type: Option<String>,
    pub aggregation_period: Option<String>,
}

impl ItemInfo {
    /// Creates an item that only knows its name.
    pub fn named(item_name: impl Into<String>) -> Self {
        Self {
            item_name: item_name.into(),
            ..Self::default()
        }
    }
}
