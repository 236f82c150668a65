//! YouTube Data API v3 playlist source.
//!
//! Pages through `playlistItems` 50 items at a time and converts each item's
//! snippet into a `Video`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{collect_pages, with_retry, FetchError, Page, RetryPolicy, Source};
use crate::snapshot::{Snapshot, Video};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/playlistItems";

/// Largest page the API will return.
const PAGE_SIZE: &str = "50";

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct PlaylistItem {
    snippet: Snippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    published_at: String,
    resource_id: ResourceId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    #[serde(default)]
    video_id: String,
}

impl TryFrom<PlaylistItem> for Video {
    type Error = FetchError;

    fn try_from(item: PlaylistItem) -> Result<Self, Self::Error> {
        let Snippet {
            title,
            published_at,
            resource_id,
        } = item.snippet;

        if resource_id.video_id.is_empty() {
            return Err(FetchError::Malformed(format!(
                "item {title:?} has no video id"
            )));
        }

        let published_at = DateTime::parse_from_rfc3339(&published_at)
            .map_err(|e| {
                FetchError::Malformed(format!(
                    "video {} has invalid publishedAt {published_at:?}: {e}",
                    resource_id.video_id
                ))
            })?
            .with_timezone(&Utc);

        Ok(Video {
            title,
            video_id: resource_id.video_id,
            published_at,
        })
    }
}

/// Parse one `playlistItems` response body.
pub fn parse_page(body: &str) -> Result<Page, FetchError> {
    let response: PlaylistItemsResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let videos = response
        .items
        .into_iter()
        .map(Video::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page {
        videos,
        next_page_token: response.next_page_token,
    })
}

// ── Source ───────────────────────────────────────────────────────────────────

pub struct YoutubeSource {
    agent: ureq::Agent,
    api_key: String,
    playlist_id: String,
    base_url: String,
    retry: RetryPolicy,
}

impl YoutubeSource {
    pub fn new(
        api_key: impl Into<String>,
        playlist_id: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        YoutubeSource {
            agent,
            api_key: api_key.into(),
            playlist_id: playlist_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            retry,
        }
    }

    /// Point at a different endpoint, e.g. a caching proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn fetch_page(&self, page_token: Option<&str>) -> Result<Page, FetchError> {
        let mut request = self
            .agent
            .get(self.base_url.as_str())
            .query("part", "snippet")
            .query("maxResults", PAGE_SIZE)
            .query("playlistId", &self.playlist_id)
            .query("key", &self.api_key);
        if let Some(token) = page_token {
            request = request.query("pageToken", token);
        }

        let mut response = request.call()?;
        let body = response.body_mut().read_to_string()?;
        parse_page(&body)
    }
}

impl Source for YoutubeSource {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn fetch_all(&self) -> Result<Snapshot, FetchError> {
        let videos = collect_pages(|token| with_retry(&self.retry, || self.fetch_page(token)))?;
        Ok(Snapshot::new(videos))
    }
}
