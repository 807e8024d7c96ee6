//! Shared data model for DataGuide 6 export ingestion.
//!
//! This crate holds the types every other crate agrees on and carries no
//! table dependency:
//!
//! - **layout**: declarative layout definitions (detection rules, cell coordinates)
//! - **item**: item-level attributes discovered in a source file
//! - **metadata**: header-block metadata extracted through a layout
//! - **numeric**: vendor number text coercion
//! - **units**: monetary unit vocabulary and per-column unit records
//! - **config**: the user-editable run configuration and its validation pass

pub mod config;
pub mod error;
pub mod item;
pub mod layout;
pub mod metadata;
pub mod numeric;
pub mod units;

pub use config::{
    DEFAULT_ENTITY_COLUMN, DEFAULT_TABLE_NAME, IngestConfig, OutputConfig, OutputFormat,
    SourceConfig,
};
pub use error::{ConfigIssue, ModelError, Result};
pub use item::ItemInfo;
pub use layout::{
    CellCheck, DetectionRules, FormatCategory, FormatOrientation, Layout, ParseMode, SettingSpec,
};
pub use metadata::{SettingValue, SourceMetadata};
pub use numeric::parse_number;
pub use units::{BASE_UNIT, MONETARY_UNITS, UnitInfo, detect_unit, normalize_column_name};
