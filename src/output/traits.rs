//! Report sink trait and implementations
//!
//! A sink is the destination of a report: it is truncated once when a run
//! starts and receives whole rendered batches afterwards.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for rendered reports
pub trait ReportSink {
    /// Empties the destination
    fn truncate(&mut self) -> OutputResult<()>;

    /// Appends one rendered batch
    ///
    /// # Arguments
    ///
    /// * `text` - The fully rendered batch; never partial
    fn append(&mut self, text: &str) -> OutputResult<()>;
}

/// Report file on disk
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: std::io::Error) -> OutputError {
        OutputError::Write {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl ReportSink for FileSink {
    fn truncate(&mut self) -> OutputResult<()> {
        File::create(&self.path).map_err(|e| self.write_error(e))?;
        Ok(())
    }

    fn append(&mut self, text: &str) -> OutputResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| self.write_error(e))?;
        file.flush().map_err(|e| self.write_error(e))?;
        Ok(())
    }
}

/// In-memory sink that keeps each appended batch separately
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub truncations: usize,
    pub batches: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything appended since the last truncation
    pub fn contents(&self) -> String {
        self.batches.concat()
    }
}

impl ReportSink for MemorySink {
    fn truncate(&mut self) -> OutputResult<()> {
        self.truncations += 1;
        self.batches.clear();
        Ok(())
    }

    fn append(&mut self, text: &str) -> OutputResult<()> {
        self.batches.push(text.to_string());
        Ok(())
    }
}
