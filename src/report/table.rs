//! Plain-text rendering for the terminal.
//!
//! - Snapshots as one line per video: publish date, video id, title
//! - Diff changes marked [new], [deleted] or [restored]
//! - Archive listings with capture times

use chrono::{DateTime, Utc};

use crate::snapshot::{Snapshot, Video};
use crate::store::diff::{Change, ChangeKind};
use crate::store::json::ArchiveEntry;

const TITLE_WIDTH: usize = 60;

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn video_line(marker: &str, video: &Video) -> String {
    format!(
        "  {:<10} {}  {:<11}  {}\n",
        marker,
        video.published_at.format("%Y-%m-%d"),
        video.video_id,
        truncate(&video.title, TITLE_WIDTH)
    )
}

fn marker(video: &Video) -> &'static str {
    if video.is_deleted() {
        "[deleted]"
    } else {
        "[+]"
    }
}

pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut output = format!(
        "{} videos, captured {}\n",
        snapshot.len(),
        format_date(snapshot.updated_at())
    );

    if snapshot.is_empty() {
        return output;
    }

    output.push_str(&"-".repeat(40));
    output.push('\n');
    for video in snapshot.videos() {
        output.push_str(&video_line("", video));
    }
    output
}

/// A diff snapshot on its own: without the previous titles, deleted videos are
/// the only change that can be told apart.
pub fn render_diff(diff: &Snapshot) -> String {
    if diff.is_empty() {
        return String::from("No changes.\n");
    }

    let mut output = String::new();
    for video in diff.videos() {
        output.push_str(&video_line(marker(video), video));
    }
    output
}

pub fn render_changes(changes: &[Change<'_>]) -> String {
    if changes.is_empty() {
        return String::from("No changes detected.\n");
    }

    let mut output = String::new();
    for change in changes {
        let label = match change.kind {
            ChangeKind::New => "[new]",
            ChangeKind::AvailabilityChanged if change.video.is_deleted() => "[deleted]",
            ChangeKind::AvailabilityChanged => "[restored]",
        };
        output.push_str(&video_line(label, change.video));
    }
    output
}

pub fn render_archives(archives: &[ArchiveEntry]) -> String {
    if archives.is_empty() {
        return String::from("No archived documents.\n");
    }

    let mut output = format!("{:<20} {}\n", "Captured", "Document");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    for entry in archives {
        output.push_str(&format!(
            "{:<20} {}\n",
            format_date(entry.captured_at),
            entry.name
        ));
    }
    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    }
}
