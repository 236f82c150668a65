//! Playlist retrieval.
//!
//! A `Source` produces the full current playlist as one snapshot. Paging and
//! transient-failure retries are handled here so sources only fetch one page.

pub mod youtube;

use std::collections::HashSet;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::snapshot::{Snapshot, Video};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed with HTTP status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(#[source] ureq::Error),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("server returned page token {0:?} twice")]
    RepeatedPageToken(String),
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => FetchError::Status(status),
            other => FetchError::Transport(other),
        }
    }
}

impl FetchError {
    /// Rate limits, server-side failures and network-level errors are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Status(status) => matches!(status, 429 | 500 | 502 | 503),
            FetchError::Transport(err) => matches!(
                err,
                ureq::Error::Io(_)
                    | ureq::Error::Timeout(_)
                    | ureq::Error::ConnectionFailed
                    | ureq::Error::HostNotFound
            ),
            FetchError::Malformed(_) | FetchError::RepeatedPageToken(_) => false,
        }
    }
}

pub trait Source {
    fn name(&self) -> &'static str;

    /// Fetch every playlist member in upstream order, captured now.
    fn fetch_all(&self) -> Result<Snapshot, FetchError>;
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub videos: Vec<Video>,
    pub next_page_token: Option<String>,
}

/// Follow page tokens from the first page until the server stops returning one.
pub fn collect_pages<F>(mut fetch_page: F) -> Result<Vec<Video>, FetchError>
where
    F: FnMut(Option<&str>) -> Result<Page, FetchError>,
{
    let mut videos = Vec::new();
    let mut seen = HashSet::new();
    let mut token: Option<String> = None;

    loop {
        let page = fetch_page(token.as_deref())?;
        debug!(
            page = seen.len() + 1,
            videos = page.videos.len(),
            "fetched page"
        );
        videos.extend(page.videos);

        match page.next_page_token.filter(|t| !t.is_empty()) {
            None => break,
            Some(next) => {
                if !seen.insert(next.clone()) {
                    return Err(FetchError::RepeatedPageToken(next));
                }
                token = Some(next);
            }
        }
    }

    Ok(videos)
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Delay before the first retry, doubled after each one
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

/// Run `f`, retrying retryable failures with exponential backoff.
pub fn with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut backoff = policy.initial_backoff;
    let mut attempt = 0;

    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_retries && err.is_retryable() => {
                attempt += 1;
                warn!(
                    attempt,
                    max = policy.max_retries,
                    error = %err,
                    backoff_ms = backoff.as_millis() as u64,
                    "retrying request"
                );
                std::thread::sleep(backoff);
                backoff = backoff.saturating_mul(2);
            }
            Err(err) => return Err(err),
        }
    }
}
