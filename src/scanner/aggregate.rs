// src/scanner/aggregate.rs
// =============================================================================
// Merges per-URL scan results into one deduplicated set of endpoints.
//
// For every ScanResult coming off the results channel:
// - error      -> remember the failure, tell the observer, move on
// - no matches -> nothing to do
// - matches    -> optionally resolve each path against its source URL,
//                 then insert it into the shared EndpointSet
//
// The EndpointSet's check-then-insert AND the "new endpoint" notification run
// inside one critical section, so an endpoint is announced at most once no
// matter how many workers or results race on it.
// =============================================================================

use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;
use url::Url;

use super::pool::ScanResult;
use super::ScanObserver;

/// A thread-safe set of unique endpoint strings.
#[derive(Debug, Default)]
pub struct EndpointSet {
    inner: Mutex<HashSet<String>>,
}

impl EndpointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `endpoint`. If it wasn't known yet, `on_new` runs while the
    /// lock is still held and `true` is returned. Re-inserting is a no-op.
    pub fn insert_with<F>(&self, endpoint: String, on_new: F) -> bool
    where
        F: FnOnce(&str),
    {
        let mut set = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if set.contains(&endpoint) {
            return false;
        }
        on_new(&endpoint);
        set.insert(endpoint);
        true
    }

    /// Consumes the set and returns its contents in lexicographic order.
    pub fn into_sorted(self) -> Vec<String> {
        let set = self.inner.into_inner().unwrap_or_else(PoisonError::into_inner);
        let mut endpoints: Vec<String> = set.into_iter().collect();
        endpoints.sort();
        endpoints
    }
}

/// A target that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
    pub url: String,
    pub message: String,
}

/// What the aggregator hands back once the channel is drained.
#[derive(Debug)]
pub struct Aggregate {
    pub endpoints: Vec<String>,
    pub failures: Vec<ScanFailure>,
    pub consumed: usize,
}

pub struct Aggregator<'a> {
    resolve: bool,
    endpoints: EndpointSet,
    failures: Vec<ScanFailure>,
    consumed: usize,
    observer: &'a dyn ScanObserver,
}

impl<'a> Aggregator<'a> {
    pub fn new(resolve: bool, observer: &'a dyn ScanObserver) -> Self {
        Self {
            resolve,
            endpoints: EndpointSet::new(),
            failures: Vec::new(),
            consumed: 0,
            observer,
        }
    }

    /// Receives up to `expected` results.
    ///
    /// Stops early only if the channel closes first, which happens when the
    /// workers were told to shut down before finishing every job.
    pub async fn drain(&mut self, results: &mut mpsc::Receiver<ScanResult>, expected: usize) {
        while self.consumed < expected {
            match results.recv().await {
                Some(result) => self.absorb(result),
                None => break,
            }
        }
    }

    /// Folds a single result into the running totals.
    pub fn absorb(&mut self, result: ScanResult) {
        self.consumed += 1;

        let endpoints = match result.outcome {
            Ok(endpoints) => endpoints,
            Err(error) => {
                self.observer.scan_failed(&result.source_url, &error);
                self.failures.push(ScanFailure {
                    url: result.source_url,
                    message: error.to_string(),
                });
                return;
            }
        };

        if endpoints.is_empty() {
            return;
        }
        self.observer.endpoints_found(&result.source_url);

        let base = if self.resolve {
            Url::parse(&result.source_url).ok()
        } else {
            None
        };

        for endpoint in endpoints {
            let endpoint = match &base {
                Some(base) => resolve_endpoint(base, &endpoint).unwrap_or(endpoint),
                None => endpoint,
            };
            let observer = self.observer;
            self.endpoints
                .insert_with(endpoint, |new| observer.new_endpoint(new));
        }
    }

    pub fn finish(self) -> Aggregate {
        Aggregate {
            endpoints: self.endpoints.into_sorted(),
            failures: self.failures,
            consumed: self.consumed,
        }
    }
}

/// Resolves `endpoint` against `base` using standard URL reference rules.
///
/// Returns None when the reference can't be resolved; callers keep the raw
/// string in that case.
pub fn resolve_endpoint(base: &Url, endpoint: &str) -> Option<String> {
    base.join(endpoint).ok().map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::sync::Arc;

    /// Observer that just writes down what it was told.
    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ScanObserver for Recorder {
        fn scan_failed(&self, url: &str, error: &FetchError) {
            self.events.lock().unwrap().push(format!("error {url}: {error}"));
        }

        fn endpoints_found(&self, url: &str) {
            self.events.lock().unwrap().push(format!("found {url}"));
        }

        fn new_endpoint(&self, endpoint: &str) {
            self.events.lock().unwrap().push(format!("new {endpoint}"));
        }
    }

    fn ok(url: &str, endpoints: &[&str]) -> ScanResult {
        ScanResult {
            source_url: url.to_string(),
            outcome: Ok(endpoints.iter().map(|e| e.to_string()).collect()),
        }
    }

    #[test]
    fn test_duplicate_endpoint_is_kept_once() {
        let recorder = Recorder::default();
        let mut aggregator = Aggregator::new(false, &recorder);
        aggregator.absorb(ok("https://a.test/", &["/static/app.js"]));
        aggregator.absorb(ok("https://b.test/", &["/static/app.js"]));

        let aggregate = aggregator.finish();
        assert_eq!(aggregate.endpoints, vec!["/static/app.js"]);
        assert_eq!(aggregate.consumed, 2);
        assert_eq!(
            recorder.events(),
            vec!["found https://a.test/", "new /static/app.js", "found https://b.test/"]
        );
    }

    #[test]
    fn test_failure_contributes_nothing() {
        let recorder = Recorder::default();
        let mut aggregator = Aggregator::new(false, &recorder);
        aggregator.absorb(ScanResult {
            source_url: "https://a.test/x.js".to_string(),
            outcome: Err(FetchError::NonOkStatus(404)),
        });
        aggregator.absorb(ok("https://b.test/", &[]));

        let aggregate = aggregator.finish();
        assert!(aggregate.endpoints.is_empty());
        assert_eq!(
            aggregate.failures,
            vec![ScanFailure {
                url: "https://a.test/x.js".to_string(),
                message: "bad status code: 404".to_string(),
            }]
        );
        // the empty success produced no events at all
        assert_eq!(recorder.events(), vec!["error https://a.test/x.js: bad status code: 404"]);
    }

    #[test]
    fn test_resolution_against_source_url() {
        let recorder = Recorder::default();
        let mut aggregator = Aggregator::new(true, &recorder);
        aggregator.absorb(ok("https://example.com/page", &["/api/x", "//cdn.example.com/lib.js"]));

        let aggregate = aggregator.finish();
        assert_eq!(
            aggregate.endpoints,
            vec!["https://cdn.example.com/lib.js", "https://example.com/api/x"]
        );
    }

    #[test]
    fn test_unparseable_source_keeps_raw_endpoint() {
        let recorder = Recorder::default();
        let mut aggregator = Aggregator::new(true, &recorder);
        aggregator.absorb(ok("relative/page", &["/api/x"]));
        assert_eq!(aggregator.finish().endpoints, vec!["/api/x"]);
    }

    #[test]
    fn test_absolute_endpoint_resolves_to_itself() {
        let base = Url::parse("https://example.com/deep/page?q=1").unwrap();
        for absolute in ["https://other.test/api/x", "http://example.com/a?b=c#d"] {
            assert_eq!(resolve_endpoint(&base, absolute).as_deref(), Some(absolute));
        }
    }

    #[test]
    fn test_final_list_is_sorted() {
        let set = EndpointSet::new();
        for endpoint in ["/z", "/a", "/m", "/a"] {
            set.insert_with(endpoint.to_string(), |_| {});
        }
        assert_eq!(set.into_sorted(), vec!["/a", "/m", "/z"]);
    }

    #[test]
    fn test_concurrent_inserts_announce_each_endpoint_once() {
        let set = Arc::new(EndpointSet::new());
        let announcements = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let set = Arc::clone(&set);
                let announcements = Arc::clone(&announcements);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        set.insert_with(format!("/api/{i}"), |new| {
                            announcements.lock().unwrap().push(new.to_string());
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let set = Arc::try_unwrap(set).unwrap();
        assert_eq!(set.into_sorted().len(), 100);
        assert_eq!(announcements.lock().unwrap().len(), 100);
    }

    #[tokio::test]
    async fn test_drain_stops_when_channel_closes_early() {
        let recorder = Recorder::default();
        let (tx, mut rx) = mpsc::channel(4);
        tx.send(ok("https://a.test/", &["/a"])).await.unwrap();
        drop(tx);

        let mut aggregator = Aggregator::new(false, &recorder);
        aggregator.drain(&mut rx, 3).await;
        assert_eq!(aggregator.finish().consumed, 1);
    }
}
