//! Bounded-concurrency batch fetching
//!
//! The orchestrator drives every fetch of a batch from the calling task:
//! - At most `concurrency_cap` fetches are in flight at once
//! - The result handler runs exactly once per fetched URI
//! - Fetch failures are logged and handed to the handler, never propagated
//! - The batch drains when the queue is empty and nothing is in flight
//!
//! Because fetches are polled from one task, the handler may freely mutate
//! state it captures; no locking is involved.

use crate::crawler::fetcher::{DocumentFetcher, FetchError, FetchedPage};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;

/// What the handler receives for each URI
pub type FetchOutcome = Result<FetchedPage, FetchError>;

/// Counters for one drained (or cancelled) batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Fetches started
    pub dispatched: usize,
    /// Fetches that returned a page
    pub succeeded: usize,
    /// Fetches that failed
    pub failed: usize,
    /// True if the batch stopped because its token was cancelled
    pub cancelled: bool,
}

impl BatchReport {
    /// Adds the counters of `other` into `self`
    pub fn merge(&mut self, other: &BatchReport) {
        self.dispatched += other.dispatched;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.cancelled |= other.cancelled;
    }
}

/// Fetches batches of URIs with a cap on simultaneous requests
#[derive(Clone)]
pub struct FetchOrchestrator {
    fetcher: Arc<dyn DocumentFetcher>,
    concurrency_cap: usize,
}

impl FetchOrchestrator {
    /// Creates an orchestrator; a cap of zero is treated as one
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, concurrency_cap: usize) -> Self {
        Self {
            fetcher,
            concurrency_cap: concurrency_cap.max(1),
        }
    }

    pub fn concurrency_cap(&self) -> usize {
        self.concurrency_cap
    }

    /// Fetches a fixed list of URIs
    ///
    /// Resolves once every URI has been fetched and handled, or as soon as
    /// `cancel` fires.
    pub async fn run_batch<F>(
        &self,
        uris: Vec<String>,
        on_result: F,
        cancel: &CancellationToken,
    ) -> BatchReport
    where
        F: FnMut(FetchOutcome),
    {
        let (tx, rx) = mpsc::unbounded_channel();
        for uri in uris {
            // the receiver is alive until run_queue returns
            let _ = tx.send(uri);
        }
        drop(tx);

        self.run_queue(rx, on_result, cancel).await
    }

    /// Fetches URIs from a queue that may grow while the batch runs
    ///
    /// Callers keep a sender to enqueue more work, including from inside
    /// `on_result`. The batch drains the first time the queue has nothing
    /// ready and no fetch is in flight; URIs sent after that are left in the
    /// receiver.
    pub async fn run_queue<F>(
        &self,
        mut queue: UnboundedReceiver<String>,
        mut on_result: F,
        cancel: &CancellationToken,
    ) -> BatchReport
    where
        F: FnMut(FetchOutcome),
    {
        let mut report = BatchReport::default();
        let mut in_flight = FuturesUnordered::new();

        loop {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            // Top up in-flight fetches
            while in_flight.len() < self.concurrency_cap {
                let Ok(uri) = queue.try_recv() else {
                    break;
                };

                report.dispatched += 1;
                let fetcher = Arc::clone(&self.fetcher);
                in_flight.push(async move { fetcher.fetch(&uri).await });
            }

            if in_flight.is_empty() {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                Some(outcome) = in_flight.next() => {
                    match &outcome {
                        Ok(_) => report.succeeded += 1,
                        Err(e) => {
                            tracing::warn!("{}", e);
                            report.failed += 1;
                        }
                    }
                    on_result(outcome);
                }
            }
        }

        if report.cancelled {
            tracing::info!(
                "Batch cancelled with {} fetches in flight",
                in_flight.len()
            );
        }

        report
    }
}
