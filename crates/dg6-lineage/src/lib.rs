//! Run lineage for DataGuide 6 ingestion.
//!
//! Records what was ingested and how it was transformed:
//!
//! - **Hashing**: SHA-256 of the source file for reproducibility
//! - **Assignment**: post-normalization item names to tables, entity counts per table
//! - **Meta table**: one `_meta` row per item with a fixed 20-column schema

mod assignment;
mod error;
mod hash;
mod meta;

pub use assignment::{build_entity_stats, build_table_assignment};
pub use error::{LineageError, Result};
pub use hash::{compute_file_sha256, source_hash};
pub use meta::{META_COLUMNS, MetaRow, MetaTable, build_meta_table};
