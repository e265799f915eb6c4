//! Harvest pipeline - main orchestration logic
//!
//! This module runs a harvest from listing pages to the written report:
//! - Fetching listing pages and keeping threads that match link keywords
//! - Grouping threads into month buckets
//! - Fetching each bucket's thread pages behind a linear start delay
//! - Sorting all records newest first and writing them once
//!
//! In per-page mode each listing page is followed and flushed on its own
//! instead, with no bucketing.

use crate::config::{listing_uri, validate, AggregationMode, Config};
use crate::crawler::aggregate::{aggregate, group_by_bucket, Bucket};
use crate::crawler::fetcher::{DocumentFetcher, HttpFetcher};
use crate::crawler::orchestrator::{BatchReport, FetchOrchestrator};
use crate::extract::{DetailExtractor, DetailRecord, ListEntry, ListExtractor, PageSelectors};
use crate::output::{ReportEmitter, RunSummary};
use crate::state::PipelineState;
use crate::HarvestError;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Main pipeline structure
pub struct CrawlPipeline {
    config: Arc<Config>,
    orchestrator: FetchOrchestrator,
    list_extractor: ListExtractor,
    detail_extractor: DetailExtractor,
    state: PipelineState,
    cancel: CancellationToken,
}

impl CrawlPipeline {
    /// Creates a new pipeline instance
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration
    /// * `fetcher` - Page source used for every fetch
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlPipeline)` - Ready to run
    /// * `Err(HarvestError)` - The configuration is invalid
    pub fn new(config: Config, fetcher: Arc<dyn DocumentFetcher>) -> Result<Self, HarvestError> {
        validate(&config)?;

        let selectors = PageSelectors::compile(&config.selectors)?;
        let list_extractor = ListExtractor::new(
            selectors.clone(),
            config.site.detail_base_uri.clone(),
            config.keywords.link.clone(),
        );
        let detail_extractor = DetailExtractor::new(selectors, config.keywords.detail.clone());
        let orchestrator = FetchOrchestrator::new(fetcher, config.crawler.concurrency_cap);

        Ok(Self {
            config: Arc::new(config),
            orchestrator,
            list_extractor,
            detail_extractor,
            state: PipelineState::Idle,
            cancel: CancellationToken::new(),
        })
    }

    /// Replaces the pipeline's cancellation token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the run when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Runs the harvest and writes the report through `emitter`
    ///
    /// The report destination is truncated first. Fetch failures only reduce
    /// the number of records; the only errors returned are report I/O
    /// failures and misuse of a pipeline that already ran.
    pub async fn run(&mut self, emitter: &mut ReportEmitter) -> Result<RunSummary, HarvestError> {
        if self.state != PipelineState::Idle {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: PipelineState::FetchingLists,
            });
        }

        let mut summary = RunSummary::start();
        emitter.start()?;

        let mode = self.config.crawler.aggregation;
        match mode {
            AggregationMode::Bucketed => self.run_bucketed(emitter, &mut summary).await?,
            AggregationMode::PerPage => self.run_per_page(emitter, &mut summary).await?,
        }

        summary.finish();
        tracing::info!(
            "Harvest finished in state {}: {} records from {} threads ({} failed fetches)",
            self.state,
            summary.records_emitted,
            summary.detail_pages_fetched,
            summary.listing_pages_failed + summary.detail_pages_failed
        );

        Ok(summary)
    }

    /// Global bucket-then-sort run with a single report write
    async fn run_bucketed(
        &mut self,
        emitter: &mut ReportEmitter,
        summary: &mut RunSummary,
    ) -> Result<(), HarvestError> {
        self.transition(PipelineState::FetchingLists)?;
        let uris = self.config.listing_uris();
        tracing::info!("Start crawling {} listing pages", uris.len());

        let (entries, report) = self.fetch_listings(uris).await;
        summary.listing_pages_fetched += report.succeeded;
        summary.listing_pages_failed += report.failed;
        summary.entries_found += entries.len();
        if report.cancelled {
            return self.cancelled(summary);
        }

        self.transition(PipelineState::GroupingByBucket)?;
        let buckets = group_by_bucket(entries);
        summary.buckets = buckets.len();
        tracing::info!("Grouped {} threads into {} buckets", summary.entries_found, buckets.len());

        self.transition(PipelineState::FetchingDetailsPerBucket)?;
        let (groups, report) = self.fetch_buckets(&buckets).await;
        summary.detail_pages_fetched += report.succeeded;
        summary.detail_pages_failed += report.failed;
        if report.cancelled {
            return self.cancelled(summary);
        }

        self.transition(PipelineState::Aggregating)?;
        let records = aggregate(groups);
        tracing::info!("Start writing report, {} records", records.len());
        summary.records_emitted += emitter.emit(&records)?;

        self.transition(PipelineState::Done)
    }

    /// Follows and flushes one listing page at a time
    async fn run_per_page(
        &mut self,
        emitter: &mut ReportEmitter,
        summary: &mut RunSummary,
    ) -> Result<(), HarvestError> {
        let pages = self.config.pages;

        for page in pages.iter() {
            self.transition(PipelineState::FetchingLists)?;
            let uri = listing_uri(&self.config.site.list_base_uri, page);
            tracing::info!("Start crawling listing page {}", page);

            let (entries, report) = self.fetch_listings(vec![uri]).await;
            summary.listing_pages_fetched += report.succeeded;
            summary.listing_pages_failed += report.failed;
            summary.entries_found += entries.len();
            if report.cancelled {
                return self.cancelled(summary);
            }

            self.transition(PipelineState::FetchingDetailsPerBucket)?;
            let uris = entries.into_iter().map(|e| e.uri).collect();
            let (records, report) = self.fetch_details(uris).await;
            summary.detail_pages_fetched += report.succeeded;
            summary.detail_pages_failed += report.failed;
            if report.cancelled {
                return self.cancelled(summary);
            }

            self.transition(PipelineState::Aggregating)?;
            let records = aggregate(vec![records]);
            summary.records_emitted += emitter.emit(&records)?;
        }

        self.transition(PipelineState::Done)
    }

    /// Fetches listing pages and collects their matching entries
    async fn fetch_listings(&self, uris: Vec<String>) -> (Vec<ListEntry>, BatchReport) {
        let mut entries = Vec::new();

        let report = self
            .orchestrator
            .run_batch(
                uris,
                |outcome| {
                    if let Ok(page) = outcome {
                        entries.extend(self.list_extractor.extract(&page));
                    }
                },
                &self.cancel,
            )
            .await;

        (entries, report)
    }

    /// Fetches thread pages and collects the records they produce
    async fn fetch_details(&self, uris: Vec<String>) -> (Vec<DetailRecord>, BatchReport) {
        let mut records = Vec::new();

        let report = self
            .orchestrator
            .run_batch(
                uris,
                |outcome| {
                    if let Ok(page) = outcome {
                        records.extend(self.detail_extractor.extract(&page));
                    }
                },
                &self.cancel,
            )
            .await;

        (records, report)
    }

    /// Fetches every bucket, bucket `k` starting after `k` delay units
    ///
    /// Buckets overlap once started; this resolves when all have drained.
    async fn fetch_buckets(&self, buckets: &[Bucket]) -> (Vec<Vec<DetailRecord>>, BatchReport) {
        let unit = Duration::from_secs(self.config.crawler.bucket_delay_unit_seconds);

        let runs = buckets.iter().enumerate().map(|(k, bucket)| async move {
            let delay = bucket_delay(unit, k);
            if !delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = self.cancel.cancelled() => {
                        let report = BatchReport {
                            cancelled: true,
                            ..BatchReport::default()
                        };
                        return (Vec::new(), report);
                    }
                }
            }

            tracing::info!(
                "Start crawling threads, bucket: {}, length: {}",
                bucket.key,
                bucket.entries.len()
            );
            self.fetch_details(bucket.uris()).await
        });

        let mut total = BatchReport::default();
        let mut groups = Vec::with_capacity(buckets.len());
        for (records, report) in join_all(runs).await {
            total.merge(&report);
            groups.push(records);
        }

        (groups, total)
    }

    fn cancelled(&mut self, summary: &mut RunSummary) -> Result<(), HarvestError> {
        summary.cancelled = true;
        tracing::warn!("Harvest cancelled during {}", self.state);
        self.transition(PipelineState::Cancelled)
    }

    fn transition(&mut self, next: PipelineState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::debug!("Pipeline state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }
}

/// Start delay of bucket `k`: `k` units, saturating at `Duration::MAX`
pub fn bucket_delay(unit: Duration, k: usize) -> Duration {
    u32::try_from(k)
        .ok()
        .and_then(|k| unit.checked_mul(k))
        .unwrap_or(Duration::MAX)
}

/// Runs a complete harvest against the live site
///
/// This function builds the HTTP fetcher and the report file emitter from
/// the configuration, then runs the pipeline. `cancel` can be used to stop
/// the run early (for example on Ctrl-C).
///
/// # Example
///
/// ```no_run
/// use forum_harvest::config::load_config;
/// use forum_harvest::crawler::run_harvest;
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let summary = run_harvest(config, CancellationToken::new()).await?;
/// println!("{} records", summary.records_emitted);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(
    config: Config,
    cancel: CancellationToken,
) -> Result<RunSummary, HarvestError> {
    let fetcher = Arc::new(HttpFetcher::from_config(&config.crawler)?);
    let mut emitter = ReportEmitter::from_config(&config.output);

    let mut pipeline = CrawlPipeline::new(config, fetcher)?.with_cancellation(cancel);
    pipeline.run(&mut emitter).await
}
