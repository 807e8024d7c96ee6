//! Source file reading.
//!
//! Vendor exports put a free-form header block above the data table, so a
//! file is read twice: the leading rows as a raw cell grid for detection and
//! metadata, then the data block from the layout's header row onwards.

mod header;
mod reader;

pub use header::{dedupe_headers, parse_csv_line};
pub use reader::{RawTable, read_data_block, read_head_rows};
