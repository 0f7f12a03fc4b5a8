// src/scanner/pool.rs
// =============================================================================
// The worker pool.
//
// How it works:
// 1. Every target URL is loaded into a job queue, then the queue is closed
// 2. N workers are spawned; each one loops:
//      take next URL -> fetch -> extract -> send ONE ScanResult
//    until the queue is empty
// 3. A failed fetch still produces a ScanResult (carrying the error), so the
//    consumer always receives exactly one result per job
//
// Because the queue is filled and closed BEFORE any worker starts, a worker
// that finds it empty knows there is nothing left and simply exits.
//
// Shutdown: every worker also watches a shutdown flag. When it flips (Ctrl-C)
// the worker drops whatever fetch it was doing and stops taking jobs.
// =============================================================================

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

use crate::error::FetchError;

use super::extract::Extractor;
use super::fetch::Fetcher;

/// Outcome of scanning one job. Exactly one is produced per job.
#[derive(Debug)]
pub struct ScanResult {
    pub source_url: String,
    pub outcome: Result<Vec<String>, FetchError>,
}

/// Shared, pre-filled, closed queue of target URLs.
#[derive(Debug)]
pub struct JobQueue {
    jobs: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl JobQueue {
    pub fn from_targets(targets: &[String]) -> Arc<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        for target in targets {
            // rx is alive right here, so send cannot fail
            let _ = tx.send(target.clone());
        }
        // Dropping the only sender closes the queue: recv() returns None once drained
        drop(tx);

        Arc::new(Self {
            jobs: Mutex::new(rx),
        })
    }

    /// Next URL to scan, or None once the queue is drained.
    pub async fn next(&self) -> Option<String> {
        self.jobs.lock().await.recv().await
    }
}

/// Handles of the spawned workers.
pub struct WorkerPool {
    handles: Vec<JoinHandle<usize>>,
}

impl WorkerPool {
    /// Spawns `threads` workers that share one fetcher and one extractor.
    ///
    /// The pool owns the result sender from here on; once every worker has
    /// exited the results channel closes by itself.
    pub fn spawn(
        threads: usize,
        queue: Arc<JobQueue>,
        fetcher: Fetcher,
        extractor: Arc<Extractor>,
        results: mpsc::Sender<ScanResult>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let handles = (0..threads)
            .map(|id| {
                tokio::spawn(worker(
                    id,
                    Arc::clone(&queue),
                    fetcher.clone(),
                    Arc::clone(&extractor),
                    results.clone(),
                    shutdown.clone(),
                ))
            })
            .collect();

        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Waits for every worker to finish and returns how many jobs they
    /// completed in total.
    pub async fn join(self) -> usize {
        let mut completed = 0;
        for outcome in join_all(self.handles).await {
            match outcome {
                Ok(count) => completed += count,
                Err(e) => tracing::warn!(error = %e, "worker task failed"),
            }
        }
        completed
    }
}

async fn worker(
    id: usize,
    queue: Arc<JobQueue>,
    fetcher: Fetcher,
    extractor: Arc<Extractor>,
    results: mpsc::Sender<ScanResult>,
    mut shutdown: watch::Receiver<bool>,
) -> usize {
    tracing::debug!(worker = id, "worker started");
    let mut completed = 0;

    loop {
        if *shutdown.borrow() {
            break;
        }
        let Some(url) = queue.next().await else {
            break;
        };

        let outcome = tokio::select! {
            outcome = scan_one(&fetcher, &extractor, &url) => outcome,
            _ = shutdown_requested(&mut shutdown) => {
                tracing::debug!(worker = id, url = %url, "abandoning fetch on shutdown");
                break;
            }
        };

        if results.send(ScanResult { source_url: url, outcome }).await.is_err() {
            // Nobody is listening any more
            break;
        }
        completed += 1;
    }

    tracing::debug!(worker = id, completed, "worker finished");
    completed
}

async fn scan_one(fetcher: &Fetcher, extractor: &Extractor, url: &str) -> Result<Vec<String>, FetchError> {
    let body = fetcher.fetch(url).await?;
    let endpoints = extractor.extract(&body);
    tracing::debug!(url, found = endpoints.len(), "scanned");
    Ok(endpoints)
}

/// Resolves once the shutdown flag is true. If the flag's sender is gone
/// without ever flipping it, this never resolves.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<JobQueue> with a Mutex inside?
//    - An mpsc Receiver has exactly one owner, but N workers want to pull
//      from it. Wrapping it in a Mutex lets them take turns; Arc lets them
//      all hold a handle to the same queue.
//    - tokio's Mutex (not std's) is used because the lock is held across
//      an .await (recv()).
//
// 2. Why does the channel close "by itself"?
//    - A channel closes when every Sender is dropped. Each worker owns one
//      clone of the results Sender and drops it when it returns, so once
//      the last worker is done, recv() on the other side yields None.
//
// 3. What does tokio::select! do here?
//    - It races the fetch against the shutdown signal. Whichever finishes
//      first wins; the loser future is dropped, which cancels the request.
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn fetcher() -> Fetcher {
        Fetcher::new(Duration::from_secs(5)).unwrap()
    }

    async fn collect(
        targets: Vec<String>,
        threads: usize,
        shutdown: watch::Receiver<bool>,
    ) -> (Vec<ScanResult>, usize) {
        let queue = JobQueue::from_targets(&targets);
        let (tx, mut rx) = mpsc::channel(targets.len().max(1));
        let pool = WorkerPool::spawn(
            threads,
            queue,
            fetcher(),
            Arc::new(Extractor::new().unwrap()),
            tx,
            shutdown,
        );
        assert_eq!(pool.len(), threads);

        let mut results = Vec::new();
        while let Some(result) = rx.recv().await {
            results.push(result);
        }
        let completed = pool.join().await;
        (results, completed)
    }

    #[tokio::test]
    async fn test_job_queue_drains_then_closes() {
        let queue = JobQueue::from_targets(&["a".to_string(), "b".to_string()]);
        assert_eq!(queue.next().await.as_deref(), Some("a"));
        assert_eq!(queue.next().await.as_deref(), Some("b"));
        assert_eq!(queue.next().await, None);
    }

    #[tokio::test]
    async fn test_one_result_per_job_including_duplicates_and_failures() {
        let server = MockServer::start_async().await;
        let ok = server
            .mock_async(|when, then| {
                when.method(GET).path("/app.js");
                then.status(200).body(r#"fetch("/api/users")"#);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/gone.js");
                then.status(404);
            })
            .await;

        let targets = vec![
            server.url("/app.js"),
            server.url("/gone.js"),
            server.url("/app.js"),
            "not a url".to_string(),
        ];

        for threads in [1, 3, 20] {
            let (_tx, shutdown) = watch::channel(false);
            let (results, completed) = collect(targets.clone(), threads, shutdown).await;
            assert_eq!(results.len(), targets.len());
            assert_eq!(completed, targets.len());

            let failures = results.iter().filter(|r| r.outcome.is_err()).count();
            assert_eq!(failures, 2);
        }

        // duplicates are fetched every time they appear: 2 per run, 3 runs
        ok.assert_hits_async(6).await;
    }

    #[tokio::test]
    async fn test_empty_queue_lets_workers_exit() {
        let (_tx, shutdown) = watch::channel(false);
        let (results, completed) = collect(Vec::new(), 4, shutdown).await;
        assert!(results.is_empty());
        assert_eq!(completed, 0);
    }

    #[tokio::test]
    async fn test_shutdown_stops_workers_without_deadlock() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow.js");
                then.status(200).delay(Duration::from_secs(3)).body("'/x'");
            })
            .await;

        let targets: Vec<String> = (0..10).map(|_| server.url("/slow.js")).collect();
        let (tx, shutdown) = watch::channel(false);

        let trigger = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let _ = tx.send(true);
        });

        let (results, _) = tokio::time::timeout(Duration::from_secs(2), collect(targets, 2, shutdown))
            .await
            .expect("pool should stop promptly after shutdown");
        trigger.await.unwrap();
        assert!(results.is_empty());
    }
}
