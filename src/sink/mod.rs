// src/sink/mod.rs
// =============================================================================
// This module persists extracted records.
//
// Submodules:
// - csv_file: the CSV file sink used by the binary
//
// Only the crawler's control loop ever writes to a sink, one page at a time,
// so sinks need no locking of their own.
// =============================================================================

mod csv_file;

pub use csv_file::CsvSink;

use std::path::Path;

use crate::error::SinkError;
use crate::model::ProductRecord;

/// Header row of every output file
pub const HEADER: [&str; 3] = ["Name", "Price", "Image"];

pub trait RecordSink: Send {
    fn destination(&self) -> &Path;

    /// Truncate the destination and write the header (start of a fresh run)
    fn reset(&mut self) -> Result<(), SinkError>;

    /// Write the header only if the destination is missing or empty
    fn ensure_header(&mut self) -> Result<(), SinkError>;

    /// Durably append one page worth of records
    fn append(&mut self, records: &[ProductRecord]) -> Result<(), SinkError>;
}
