//! CLI library components for DataGuide 6 ingestion.

pub mod config_io;
pub mod logging;
pub mod pipeline;
pub mod types;
