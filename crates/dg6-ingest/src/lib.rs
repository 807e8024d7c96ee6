//! DataGuide 6 source ingestion.
//!
//! This crate turns a vendor export file into a canonical table:
//!
//! - **Reading**: header-block rows and the data block of a CSV export
//! - **Registry**: declarative layouts, embedded or loaded from a directory
//! - **Detection**: priority-ordered layout matching and parser selection
//! - **Parsing**: wide time-series reshaping and misc column classification
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use dg6_ingest::{LayoutRegistry, detect_format, parse_file};
//!
//! let registry = LayoutRegistry::builtin()?;
//! let path = Path::new("inputs/ohlcv.csv");
//! let detection = detect_format(path, &registry)?;
//! let parsed = parse_file(path, &detection)?;
//! ```

mod detect;
mod error;
mod parse;
mod registry;
mod source;

// === Error Types ===
pub use error::{IngestError, Result};

// === Layouts ===
pub use registry::{BUILTIN_LAYOUTS, LayoutRegistry, extract_settings};

// === Detection ===
pub use detect::{Detection, ParserKind, WIDE_FIXED_COLUMNS, detect_format, layout_matches};

// === Source Reading ===
pub use source::{RawTable, parse_csv_line, read_data_block, read_head_rows};

// === Parsing ===
pub use parse::{
    DATE_COLUMN, ParseResult, VALUE_SAMPLE_SIZE, is_value_column, parse_file, parse_misc,
    parse_snapshot, parse_timeseries_wide,
};
