//! Transform stages for DataGuide 6 canonical tables.
//!
//! A parsed table goes through four stages, each returning a new table:
//!
//! - **Number parsing**: text values with thousands separators to `Float64`
//! - **Unit normalization**: monetary columns scaled to 원 and renamed
//! - **Empty-entity elimination**: entities with no data at all are removed
//! - **Table splitting**: one output table per configured item group
//!
//! # Example
//!
//! ```ignore
//! use dg6_transform::TransformPipeline;
//!
//! let pipeline = TransformPipeline::from_config(&config);
//! let result = pipeline.run(&parsed.table, Some(&parsed.key_columns))?;
//! for (name, table) in &result.tables {
//!     println!("{name}: {} rows", table.height());
//! }
//! ```

mod empty;
mod error;
mod frame;
mod numbers;
mod pipeline;
mod splitter;
mod units;

pub use empty::{DropStats, drop_empty_entities};
pub use error::{Result, TransformError};
pub use numbers::parse_numbers;
pub use pipeline::{DEFAULT_KEY_COLUMNS, PipelineOptions, PipelineResult, TransformPipeline};
pub use splitter::split_tables;
pub use units::{normalize_units, normalized_name};
