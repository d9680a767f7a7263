use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::RecorderError;

/// A single append-only CSV file with a fixed header.
///
/// Every append is serialized into one buffer and written with a single `write_all`
/// while holding the file's lock, so concurrent writers never interleave rows.
#[derive(Debug)]
pub struct CsvLog {
    path: PathBuf,
    header: &'static [&'static str],
    lock: Mutex<()>,
}

impl CsvLog {
    pub fn new(path: PathBuf, header: &'static [&'static str]) -> Self {
        Self {
            path,
            header,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with its header when absent or empty. Existing content is kept.
    pub fn ensure_header(&self) -> Result<(), RecorderError> {
        let _guard = self.lock.lock();
        if self.needs_header()? {
            let bytes = self.encode(true, None)?;
            self.write_bytes(&bytes)?;
        }
        Ok(())
    }

    pub fn append(&self, fields: &[&str]) -> Result<(), RecorderError> {
        let _guard = self.lock.lock();
        let with_header = self.needs_header()?;
        let bytes = self.encode(with_header, Some(fields))?;
        self.write_bytes(&bytes)
    }

    /// All data rows in append order. A missing file reads as empty; rows that do not
    /// parse are skipped with a warning.
    pub fn read_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, RecorderError> {
        let _guard = self.lock.lock();
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| self.csv_error(e))?;

        let mut rows = Vec::new();
        for row in reader.deserialize() {
            match row {
                Ok(record) => rows.push(record),
                Err(e) => {
                    let line = e.position().map(|p| p.line());
                    warn!(path = %self.path.display(), ?line, error = %e, "Skipping unreadable log row");
                }
            }
        }
        Ok(rows)
    }

    fn needs_header(&self) -> Result<bool, RecorderError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn encode(&self, with_header: bool, fields: Option<&[&str]>) -> Result<Vec<u8>, RecorderError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if with_header {
            writer.write_record(self.header).map_err(|e| self.csv_error(e))?;
        }
        if let Some(fields) = fields {
            writer.write_record(fields).map_err(|e| self.csv_error(e))?;
        }
        writer
            .into_inner()
            .map_err(|e| self.io_error(e.into_error()))
    }

    fn write_bytes(&self, bytes: &[u8]) -> Result<(), RecorderError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(bytes).map_err(|e| self.io_error(e))?;
        file.flush().map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> RecorderError {
        RecorderError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> RecorderError {
        RecorderError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}
