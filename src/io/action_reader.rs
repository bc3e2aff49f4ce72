//! Streaming reader over action log CSV files
//!
//! Yields one [`StoreAction`] per CSV row, delegating format concerns to the
//! csv_format module.
//!
//! ```no_run
//! use sn_storefront::io::ActionReader;
//! use std::path::Path;
//!
//! let reader = ActionReader::new(Path::new("actions.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(action) => println!("Replaying {}", action.name()),
//!         Err(e) => eprintln!("Skipping row: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Malformed rows are yielded as `StoreError::ParseError` carrying the
//!   1-based file line (the header is line 1), and iteration continues

use crate::io::csv_format::{convert_csv_record, CsvActionRecord};
use crate::types::{StoreAction, StoreError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

/// Action log reader
///
/// Reads rows one at a time; memory use does not grow with the file.
#[derive(Debug)]
pub struct ActionReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl ActionReader {
    /// Open an action log
    ///
    /// The CSV reader trims whitespace from all fields and accepts rows with
    /// trailing columns omitted.
    ///
    /// # Errors
    ///
    /// * `FileNotFound` if the path does not exist
    /// * `IoError` if the file cannot be opened for another reason
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => StoreError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), e),
            },
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
        })
    }
}

impl Iterator for ActionReader {
    type Item = Result<StoreAction, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvActionRecord>();
        let row = deserializer.next()?;
        self.line_num += 1;
        let line = Some(self.line_num);

        Some(match row {
            Ok(record) => convert_csv_record(record)
                .map_err(|message| StoreError::ParseError { line, message }),
            Err(e) => Err(StoreError::ParseError {
                line,
                message: e.to_string(),
            }),
        })
    }
}
