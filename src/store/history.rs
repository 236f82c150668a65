//! Reconciliation and history retention.
//!
//! Decides what a run persists given the freshly fetched playlist and
//! whatever the store already holds, then carries it out:
//! - no stored playlist: write the playlist, nothing else
//! - nothing reportable and same size: write nothing
//! - nothing reportable but the size changed: replace the playlist only
//! - reportable changes: replace the playlist and the diff
//!
//! With history enabled, the previous playlist and diff are archived under
//! `<RFC3339 capture time>_<filename>` before anything is overwritten.
//! Archival is best-effort: failures are collected and logged, never fatal.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, warn};

use super::diff;
use super::{Store, StoreError, StoreResult};
use crate::snapshot::Snapshot;

/// Base filenames of the live documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNames {
    pub playlist: String,
    pub diff: String,
}

impl FileNames {
    pub fn new(playlist: impl Into<String>, diff: impl Into<String>) -> Self {
        FileNames {
            playlist: playlist.into(),
            diff: diff.into(),
        }
    }
}

/// Name an archived copy of `base` captured at `captured_at`.
pub fn archive_name(captured_at: DateTime<Utc>, base: &str) -> String {
    format!(
        "{}_{}",
        captured_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        base
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// No usable stored playlist; write the current one and stop
    Initialize,
    NoOp,
    ReplacePlaylistOnly,
    ReplacePlaylistAndDiff,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Initialize => "initialize",
            Action::NoOp => "no-op",
            Action::ReplacePlaylistOnly => "replace-playlist",
            Action::ReplacePlaylistAndDiff => "replace-playlist-and-diff",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a run should do. `diff` is set only for `ReplacePlaylistAndDiff`.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub diff: Option<Snapshot>,
}

/// Pure decision procedure; touches no storage.
pub fn decide(current: &Snapshot, previous: Option<&Snapshot>) -> Decision {
    let Some(previous) = previous else {
        return Decision {
            action: Action::Initialize,
            diff: None,
        };
    };

    let diff = diff::diff(previous, current);
    if !diff.is_empty() {
        return Decision {
            action: Action::ReplacePlaylistAndDiff,
            diff: Some(diff),
        };
    }

    if current.len() == previous.len() {
        return Decision {
            action: Action::NoOp,
            diff: None,
        };
    }

    if current.len() < previous.len() {
        warn!(
            previous = previous.len(),
            current = current.len(),
            "playlist shrank; removed videos are not recorded in the diff"
        );
    }

    Decision {
        action: Action::ReplacePlaylistOnly,
        diff: None,
    }
}

/// A document that could not be archived or cleaned up after archiving.
#[derive(Debug)]
pub struct ArchiveFailure {
    pub document: String,
    pub error: StoreError,
}

impl fmt::Display for ArchiveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.document, self.error)
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct Reconciliation {
    pub action: Action,
    pub diff: Option<Snapshot>,
    /// Archive documents written, in write order
    pub archived: Vec<String>,
    pub archive_failures: Vec<ArchiveFailure>,
}

/// Previously stored state, each part loaded best-effort.
#[derive(Debug, Clone, Default)]
pub struct Previous {
    pub playlist: Option<Snapshot>,
    pub diff: Option<Snapshot>,
}

pub struct History<'a, S: Store + ?Sized> {
    store: &'a S,
    names: &'a FileNames,
    keep_history: bool,
}

impl<'a, S: Store + ?Sized> History<'a, S> {
    pub fn new(store: &'a S, names: &'a FileNames, keep_history: bool) -> Self {
        History {
            store,
            names,
            keep_history,
        }
    }

    /// Load the live playlist and diff. Anything missing or unreadable is `None`.
    pub fn load_previous(&self) -> Previous {
        let playlist = match self.store.load(&self.names.playlist) {
            Ok(snapshot) => Some(snapshot),
            Err(e) if e.is_not_found() => {
                info!(document = %self.names.playlist, "no stored playlist, a new one will be created");
                None
            }
            Err(e) => {
                warn!(document = %self.names.playlist, error = %e, "stored playlist unreadable, a new one will be created");
                None
            }
        };

        let diff = match self.store.load(&self.names.diff) {
            Ok(snapshot) => Some(snapshot),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!(document = %self.names.diff, error = %e, "stored diff unreadable, treating it as empty");
                None
            }
        };

        Previous { playlist, diff }
    }

    /// Load the stored state and reconcile `current` against it.
    pub fn sync(&self, current: &Snapshot) -> StoreResult<Reconciliation> {
        let previous = self.load_previous();
        self.reconcile(current, previous.playlist, previous.diff)
    }

    /// Decide and persist. Errors only when a live document cannot be written.
    pub fn reconcile(
        &self,
        current: &Snapshot,
        previous_playlist: Option<Snapshot>,
        previous_diff: Option<Snapshot>,
    ) -> StoreResult<Reconciliation> {
        let Decision { action, diff } = decide(current, previous_playlist.as_ref());

        let mut outcome = Reconciliation {
            action,
            diff: None,
            archived: Vec::new(),
            archive_failures: Vec::new(),
        };

        match action {
            Action::Initialize => {
                self.store.save(&self.names.playlist, current)?;
                info!(videos = current.len(), document = %self.names.playlist, "playlist initialized");
            }
            Action::NoOp => {
                info!("no diff and no new videos, nothing to do");
            }
            Action::ReplacePlaylistOnly | Action::ReplacePlaylistAndDiff => {
                if self.keep_history {
                    if let Some(previous) = &previous_playlist {
                        self.archive(previous, previous_diff.as_ref(), &mut outcome);
                    }
                }

                self.store.save(&self.names.playlist, current)?;
                match &diff {
                    Some(diff) => {
                        self.store.save(&self.names.diff, diff)?;
                        info!(changed = diff.len(), "playlist and diff updated");
                    }
                    None => info!(videos = current.len(), "playlist size changed, playlist updated"),
                }
            }
        }

        outcome.diff = diff;
        Ok(outcome)
    }

    fn archive(&self, playlist: &Snapshot, diff: Option<&Snapshot>, outcome: &mut Reconciliation) {
        let name = archive_name(playlist.updated_at(), &self.names.playlist);
        self.archive_one(name, playlist, outcome);

        let Some(diff) = diff.filter(|d| !d.is_empty()) else {
            return;
        };

        let name = archive_name(diff.updated_at(), &self.names.diff);
        if !self.archive_one(name, diff, outcome) {
            // keep the live diff when its only copy failed to archive
            return;
        }

        if let Err(error) = self.store.delete(&self.names.diff) {
            warn!(document = %self.names.diff, %error, "failed to remove archived diff");
            outcome.archive_failures.push(ArchiveFailure {
                document: self.names.diff.clone(),
                error,
            });
        }
    }

    fn archive_one(&self, name: String, snapshot: &Snapshot, outcome: &mut Reconciliation) -> bool {
        match self.store.save(&name, snapshot) {
            Ok(()) => {
                info!(document = %name, "archived");
                outcome.archived.push(name);
                true
            }
            Err(error) => {
                warn!(document = %name, %error, "failed to archive");
                outcome.archive_failures.push(ArchiveFailure {
                    document: name,
                    error,
                });
                false
            }
        }
    }
}
