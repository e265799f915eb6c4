//! Crawler module for page fetching and pipeline orchestration
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching behind the `DocumentFetcher` trait
//! - Bounded-concurrency batch fetching with drain detection
//! - Month bucketing and final record ordering
//! - The pipeline that ties the stages together

mod aggregate;
mod fetcher;
mod orchestrator;
mod pipeline;

pub use aggregate::{aggregate, group_by_bucket, Bucket};
pub use fetcher::{
    build_http_client, fetch_url, DocumentFetcher, FetchError, FetchErrorKind, FetchedPage,
    HttpFetcher,
};
pub use orchestrator::{BatchReport, FetchOrchestrator, FetchOutcome};
pub use pipeline::{bucket_delay, run_harvest, CrawlPipeline};

use crate::config::Config;
use crate::output::RunSummary;
use crate::HarvestError;
use tokio_util::sync::CancellationToken;

/// Runs a complete harvest operation
///
/// This is the main entry point for starting a harvest. It will:
/// 1. Build the HTTP client
/// 2. Truncate the report file
/// 3. Fetch listing pages and filter thread links
/// 4. Fetch thread pages and extract identifier codes
/// 5. Sort the records and write the report
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - Harvest completed (possibly with failed fetches)
/// * `Err(HarvestError)` - Harvest could not run or the report could not be written
pub async fn harvest(config: Config) -> Result<RunSummary, HarvestError> {
    run_harvest(config, CancellationToken::new()).await
}
