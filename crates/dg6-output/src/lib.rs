//! Export of DataGuide 6 output tables.
//!
//! Each split table is written as `<table>.csv` or `<table>.parquet` next to
//! a `_meta` lineage table in the same format.

mod error;
mod export;

pub use error::{OutputError, Result};
pub use export::{META_TABLE_NAME, export_tables, write_table};
