// src/scanner/mod.rs
// =============================================================================
// The fetch-and-extract pipeline.
//
//   targets -> JobQueue -> WorkerPool (fetch + extract) -> results channel
//           -> Aggregator (resolve + dedupe) -> sorted endpoints
//
// Submodules:
// - fetch:     one GET per URL with the shared HTTP client
// - extract:   the endpoint regex
// - pool:      job queue and the N concurrent workers
// - aggregate: the deduplicated endpoint set and the result consumer
//
// This file wires them together for one run. Nothing is printed here;
// progress is reported through the ScanObserver trait so the console
// reporter (or a test) decides what to do with it.
// =============================================================================

mod aggregate;
mod extract;
mod fetch;
mod pool;

use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::config::ScanConfig;
use crate::error::{FetchError, FinderError};

use aggregate::Aggregator;
use extract::Extractor;
use fetch::Fetcher;
use pool::{JobQueue, WorkerPool};

pub use aggregate::ScanFailure;

/// Receives progress events while results are being aggregated.
///
/// `new_endpoint` is called from inside the endpoint set's critical section,
/// so it fires at most once per unique endpoint.
pub trait ScanObserver: Send + Sync {
    fn scan_failed(&self, url: &str, error: &FetchError);
    fn endpoints_found(&self, url: &str);
    fn new_endpoint(&self, endpoint: &str);
}

/// Final result of a run.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Unique endpoints, sorted
    pub endpoints: Vec<String>,
    pub failures: Vec<ScanFailure>,
    /// How many targets were scanned (successfully or not)
    pub scanned: usize,
    /// How many targets there were
    pub total: usize,
    /// True when a shutdown cut the run short
    pub interrupted: bool,
}

/// Scans every target and returns the sorted unique endpoints.
///
/// Per-URL failures never end the run; only building the HTTP client or the
/// pattern can fail here.
pub async fn run_scan(
    targets: Vec<String>,
    config: &ScanConfig,
    observer: &dyn ScanObserver,
    shutdown: watch::Receiver<bool>,
) -> Result<ScanOutcome, FinderError> {
    let total = targets.len();
    let fetcher = Fetcher::new(config.timeout)?;
    let extractor = Arc::new(Extractor::new()?);

    // Every job is queued (and the queue closed) before a worker starts
    let queue = JobQueue::from_targets(&targets);
    let (results_tx, mut results_rx) = mpsc::channel(total.max(1));

    let pool = WorkerPool::spawn(
        config.threads,
        queue,
        fetcher,
        extractor,
        results_tx,
        shutdown,
    );
    tracing::debug!(workers = pool.len(), jobs = total, "worker pool started");

    let mut aggregator = Aggregator::new(config.resolve, observer);
    aggregator.drain(&mut results_rx, total).await;

    // All workers must be gone before the receiving side is dropped
    let completed = pool.join().await;
    drop(results_rx);

    let aggregate = aggregator.finish();
    // A shutdown that lands after the last result doesn't cut anything short
    let interrupted = aggregate.consumed < total;
    if interrupted {
        tracing::warn!(scanned = aggregate.consumed, total, "scan interrupted");
    }
    tracing::debug!(completed, unique = aggregate.endpoints.len(), "scan finished");

    Ok(ScanOutcome {
        endpoints: aggregate.endpoints,
        failures: aggregate.failures,
        scanned: aggregate.consumed,
        total,
        interrupted,
    })
}
