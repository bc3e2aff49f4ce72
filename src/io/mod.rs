//! I/O module
//!
//! Handles action log parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, report serialization)
//! - `action_reader` - Streaming action log reader with iterator interface

pub mod action_reader;
pub mod csv_format;

pub use action_reader::ActionReader;
pub use csv_format::{convert_csv_record, write_catalog_csv, write_orders_csv, CsvActionRecord};
