// src/scanner/fetch.rs
// =============================================================================
// Fetches the raw body of a target URL.
//
// Key points:
// - ONE shared reqwest client for every worker (connection pooling)
// - A desktop browser User-Agent, so trivial bot filters let us through
// - Certificate checks are OFF: targets are often self-signed or internal
// - Exactly one attempt per URL, no retries
//
// Every failure is classified into a FetchError variant so the reporter can
// say precisely what went wrong for that URL.
// =============================================================================

use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::error::{FetchError, FinderError};

/// Browser string sent with every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

// Client is an Arc internally, so cloning a Fetcher for each worker is cheap
// and every clone shares the same connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self, FinderError> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(FinderError::HttpClient)?;

        Ok(Self { client })
    }

    /// GETs `url` and returns its body as text.
    ///
    /// Bytes that aren't valid UTF-8 are replaced rather than rejected; the
    /// endpoint pattern only cares about ASCII anyway.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let request = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .build()
            .map_err(FetchError::RequestConstruction)?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(FetchError::Transport)?;

        // Only a plain 200 counts; 204, 404, 500... are all "bad status"
        if response.status() != StatusCode::OK {
            return Err(FetchError::NonOkStatus(response.status().as_u16()));
        }

        let body = response.bytes().await.map_err(FetchError::BodyRead)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
