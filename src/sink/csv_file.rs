// src/sink/csv_file.rs
// =============================================================================
// Writes ProductRecords to a CSV file.
//
// Every call opens the file, writes, flushes, syncs and closes it again.
// Nothing is buffered between pages, so after `append` returns the page is
// on disk and a crash later in the run can't take it with it.
//
// The `csv` crate takes care of quoting names/prices that contain commas or
// quotes.
// =============================================================================

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use super::{RecordSink, HEADER};
use crate::error::SinkError;
use crate::model::ProductRecord;

pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> SinkError {
        SinkError::Csv {
            path: self.path.clone(),
            source,
        }
    }

    // Writes rows to an already opened file and makes them durable
    fn write_rows<'a, I>(&self, file: File, rows: I) -> Result<(), SinkError>
    where
        I: IntoIterator<Item = [&'a str; 3]>,
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        for row in rows {
            writer.write_record(row).map_err(|e| self.csv_error(e))?;
        }

        let file = writer
            .into_inner()
            .map_err(|e| self.io_error(e.into_error()))?;
        file.sync_all().map_err(|e| self.io_error(e))
    }
}

impl RecordSink for CsvSink {
    fn destination(&self) -> &Path {
        &self.path
    }

    fn reset(&mut self) -> Result<(), SinkError> {
        let file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        self.write_rows(file, [HEADER])
    }

    fn ensure_header(&mut self) -> Result<(), SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        let len = file.metadata().map_err(|e| self.io_error(e))?.len();
        if len > 0 {
            return Ok(());
        }

        self.write_rows(file, [HEADER])
    }

    fn append(&mut self, records: &[ProductRecord]) -> Result<(), SinkError> {
        // No `create`: the header must already be there
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        self.write_rows(
            file,
            records
                .iter()
                .map(|r| [r.name.as_str(), r.price.as_str(), r.image_url.as_str()]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_ensure_header_twice_writes_one_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = CsvSink::new(&path);

        sink.ensure_header().unwrap();
        sink.ensure_header().unwrap();

        assert_eq!(read(&path), "Name,Price,Image\n");
    }

    #[test]
    fn test_ensure_header_keeps_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "Name,Price,Image\nOld - 1,1€,a.jpg\n").unwrap();

        CsvSink::new(&path).ensure_header().unwrap();

        assert_eq!(read(&path), "Name,Price,Image\nOld - 1,1€,a.jpg\n");
    }

    #[test]
    fn test_reset_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale data\n").unwrap();

        CsvSink::new(&path).reset().unwrap();

        assert_eq!(read(&path), "Name,Price,Image\n");
    }

    #[test]
    fn test_append_accumulates_pages() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = CsvSink::new(&path);

        sink.reset().unwrap();
        sink.append(&[ProductRecord::new("Shampoo - 200ml", "€9.99", "img_a.jpg")])
            .unwrap();
        sink.append(&[ProductRecord::new("Brush - Standard", "€5.50", "img_b.jpg")])
            .unwrap();

        assert_eq!(
            read(&path),
            "Name,Price,Image\nShampoo - 200ml,€9.99,img_a.jpg\nBrush - Standard,€5.50,img_b.jpg\n"
        );
    }

    #[test]
    fn test_fields_with_delimiters_are_quoted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = CsvSink::new(&path);

        sink.reset().unwrap();
        sink.append(&[ProductRecord::new("Treats, \"mini\" - 1kg", "9,99 €", "a.jpg")])
            .unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "Treats, \"mini\" - 1kg");
        assert_eq!(&rows[0][1], "9,99 €");
    }

    #[test]
    fn test_append_to_missing_destination_fails() {
        let dir = TempDir::new().unwrap();
        let mut sink = CsvSink::new(dir.path().join("never-created.csv"));

        let err = sink
            .append(&[ProductRecord::new("a", "b", "c")])
            .unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
    }

    #[test]
    fn test_unwritable_destination_fails() {
        let dir = TempDir::new().unwrap();
        let mut sink = CsvSink::new(dir.path().join("no-such-dir").join("out.csv"));
        assert!(sink.reset().is_err());
        assert!(sink.ensure_header().is_err());
    }
}
