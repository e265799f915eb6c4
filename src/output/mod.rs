//! Output module for rendering and writing harvest reports
//!
//! This module handles:
//! - Rendering records as HTML or markdown
//! - Writing whole rendered batches to the report sink
//! - Recording run statistics

mod html;
mod markdown;
pub mod stats;
mod traits;

pub use html::render_html;
pub use markdown::render_markdown;
pub use stats::{print_summary, RunSummary};
pub use traits::{FileSink, MemorySink, OutputError, OutputResult, ReportSink};

use crate::config::{OutputConfig, ReportFormat};
use crate::extract::DetailRecord;

/// Renders records and writes them to a sink
///
/// A batch is rendered completely before it is written, and written with a
/// single append, so the report never holds half a batch.
pub struct ReportEmitter {
    format: ReportFormat,
    sink: Box<dyn ReportSink>,
}

impl ReportEmitter {
    pub fn new(format: ReportFormat, sink: Box<dyn ReportSink>) -> Self {
        Self { format, sink }
    }

    /// Emitter writing to the configured report file
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.format, Box::new(FileSink::new(&config.file)))
    }

    /// Renders records in the configured format, in input order
    pub fn render(&self, records: &[DetailRecord]) -> String {
        match self.format {
            ReportFormat::Html => render_html(records),
            ReportFormat::Markdown => render_markdown(records),
        }
    }

    /// Empties the destination at the start of a run
    pub fn start(&mut self) -> OutputResult<()> {
        self.sink.truncate()
    }

    /// Renders and appends a batch, returning how many records were written
    ///
    /// An empty batch writes nothing.
    pub fn emit(&mut self, records: &[DetailRecord]) -> OutputResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let text = self.render(records);
        self.sink.append(&text)?;
        Ok(records.len())
    }
}
