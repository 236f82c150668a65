//! Playlist snapshots.
//!
//! A snapshot is the full, ordered membership of a playlist at one point in
//! time. Diffs use the same type: a snapshot holding only the videos that
//! changed, stamped with the time the comparison ran.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Title the platform substitutes for a video that was removed or made private.
pub const DELETED_TITLE: &str = "Deleted video";

/// One playlist member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub title: String,
    pub video_id: String,
    pub published_at: DateTime<Utc>,
}

impl Video {
    pub fn new(video_id: impl Into<String>, title: impl Into<String>, published_at: DateTime<Utc>) -> Self {
        Video {
            title: title.into(),
            video_id: video_id.into(),
            published_at,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.title == DELETED_TITLE
    }
}

/// Ordered playlist contents plus the time they were captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    videos: Vec<Video>,
    updated_at: DateTime<Utc>,
}

impl Snapshot {
    /// Build a snapshot captured now.
    pub fn new(videos: Vec<Video>) -> Self {
        Self::at(videos, Utc::now())
    }

    /// Build a snapshot with an explicit capture time.
    pub fn at(videos: Vec<Video>, updated_at: DateTime<Utc>) -> Self {
        Snapshot { videos, updated_at }
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// Serialize as a pretty-printed JSON document.
    pub fn to_document(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_document(document: &str) -> serde_json::Result<Self> {
        serde_json::from_str(document)
    }
}

// older documents store an empty diff as `"videos": null`
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Video>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Video>>::deserialize(deserializer)?.unwrap_or_default())
}
