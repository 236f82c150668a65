//! Snapshot comparison engine.
//!
//! Compares a previous snapshot against the current one:
//! - Matches videos by video id only
//! - Reports videos that are new since the previous snapshot
//! - Reports videos whose title moved to or from the deleted-video title
//!
//! Removals and every other title edit are not reported.

use crate::snapshot::{Snapshot, Video, DELETED_TITLE};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Video id absent from the previous snapshot
    New,
    /// Title changed to or from the deleted-video title
    AvailabilityChanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Change<'a> {
    pub kind: ChangeKind,
    pub video: &'a Video,
    /// Title in the previous snapshot, when the video was already there
    pub previous_title: Option<&'a str>,
}

fn classify(previous: Option<&Video>, current: &Video) -> Option<ChangeKind> {
    match previous {
        None => Some(ChangeKind::New),
        Some(p)
            if p.title != current.title
                && (p.title == DELETED_TITLE || current.title == DELETED_TITLE) =>
        {
            Some(ChangeKind::AvailabilityChanged)
        }
        Some(_) => None,
    }
}

/// Classify every video in `current` against `previous`, in `current` order.
pub fn compare<'a>(previous: &'a Snapshot, current: &'a Snapshot) -> Vec<Change<'a>> {
    // duplicate ids collapse to the last occurrence
    let by_id: HashMap<&str, &Video> = previous
        .videos()
        .iter()
        .map(|v| (v.video_id.as_str(), v))
        .collect();

    current
        .videos()
        .iter()
        .filter_map(|video| {
            let prior = by_id.get(video.video_id.as_str()).copied();
            classify(prior, video).map(|kind| Change {
                kind,
                video,
                previous_title: prior.map(|p| p.title.as_str()),
            })
        })
        .collect()
}

/// Build the diff snapshot: changed videos only, stamped with the time of comparison.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> Snapshot {
    let videos = compare(previous, current)
        .into_iter()
        .map(|change| change.video.clone())
        .collect();
    Snapshot::new(videos)
}
