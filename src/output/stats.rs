//! Run statistics
//!
//! This module collects the counters of one harvest run and prints them
//! once the run is over.

use chrono::{DateTime, Local};

/// Counters and timings for one harvest run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,

    /// Listing pages fetched successfully
    pub listing_pages_fetched: usize,
    /// Listing pages that failed to fetch
    pub listing_pages_failed: usize,
    /// Matching thread entries found on listing pages
    pub entries_found: usize,
    /// Month buckets the entries were grouped into
    pub buckets: usize,
    /// Thread pages fetched successfully
    pub detail_pages_fetched: usize,
    /// Thread pages that failed to fetch
    pub detail_pages_failed: usize,
    /// Records written to the report
    pub records_emitted: usize,
    /// True if the run was cancelled before it finished
    pub cancelled: bool,
    /// Digest of the configuration text the run was started from
    pub config_hash: Option<String>,
}

impl RunSummary {
    /// Starts a summary stamped with the current time
    pub fn start() -> Self {
        Self {
            started_at: Local::now(),
            finished_at: None,
            listing_pages_fetched: 0,
            listing_pages_failed: 0,
            entries_found: 0,
            buckets: 0,
            detail_pages_fetched: 0,
            detail_pages_failed: 0,
            records_emitted: 0,
            cancelled: false,
            config_hash: None,
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    /// Whole seconds between start and finish, if finished
    pub fn elapsed_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints a run summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Started:  {}", summary.started_at.format("%Y-%m-%d %H:%M:%S"));
    if let Some(finished) = summary.finished_at {
        println!("Finished: {}", finished.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(hash) = &summary.config_hash {
        println!("Config:   {}", hash);
    }
    println!();

    println!("Listing pages:");
    println!("  Fetched: {}", summary.listing_pages_fetched);
    println!("  Failed: {}", summary.listing_pages_failed);
    println!("  Matching threads: {}", summary.entries_found);
    println!("  Month buckets: {}", summary.buckets);
    println!();

    println!("Thread pages:");
    println!("  Fetched: {}", summary.detail_pages_fetched);
    println!("  Failed: {}", summary.detail_pages_failed);
    println!("  Records written: {}", summary.records_emitted);
    println!();

    if summary.cancelled {
        println!("Run was cancelled before completion");
    }

    if let Some(seconds) = summary.elapsed_seconds() {
        println!("Finished. Time Span: {} Seconds", seconds);
    }
}
