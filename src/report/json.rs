//! JSON output for scripting and piping.

use serde_json::{json, Value};

use crate::snapshot::Snapshot;
use crate::store::history::Reconciliation;
use crate::store::json::ArchiveEntry;

pub fn render_snapshot(snapshot: &Snapshot) -> String {
    snapshot
        .to_document()
        .unwrap_or_else(|e| json!({ "error": e.to_string() }).to_string())
}

pub fn outcome_value(outcome: &Reconciliation) -> Value {
    json!({
        "action": outcome.action.as_str(),
        "changed": outcome.diff.as_ref().map(|d| d.videos()).unwrap_or_default(),
        "archived": outcome.archived,
        "archiveFailures": outcome
            .archive_failures
            .iter()
            .map(|f| json!({ "document": f.document, "error": f.error.to_string() }))
            .collect::<Vec<_>>(),
    })
}

pub fn render_outcome(outcome: &Reconciliation) -> String {
    serde_json::to_string_pretty(&outcome_value(outcome)).unwrap_or_else(|_| String::from("{}"))
}

pub fn render_archives(archives: &[ArchiveEntry]) -> String {
    let entries: Vec<Value> = archives
        .iter()
        .map(|a| json!({ "document": a.name, "capturedAt": a.captured_at }))
        .collect();
    serde_json::to_string_pretty(&entries).unwrap_or_else(|_| String::from("[]"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Video;
    use crate::store::history::{Action, ArchiveFailure};
    use crate::store::StoreError;
    use chrono::{TimeZone, Utc};

    #[test]
    fn outcome_lists_changes_and_failures() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let outcome = Reconciliation {
            action: Action::ReplacePlaylistAndDiff,
            diff: Some(Snapshot::at(vec![Video::new("b", "B", at)], at)),
            archived: vec!["2024-01-01T00:00:00Z_playlist.json".into()],
            archive_failures: vec![ArchiveFailure {
                document: "2024-01-01T00:00:00Z_diff.json".into(),
                error: StoreError::NotFound("x".into()),
            }],
        };

        let value = outcome_value(&outcome);
        assert_eq!(value["action"], "replace-playlist-and-diff");
        assert_eq!(value["changed"][0]["videoId"], "b");
        assert_eq!(value["archived"][0], "2024-01-01T00:00:00Z_playlist.json");
        assert_eq!(
            value["archiveFailures"][0]["document"],
            "2024-01-01T00:00:00Z_diff.json"
        );
    }

    #[test]
    fn noop_outcome_has_no_changes() {
        let outcome = Reconciliation {
            action: Action::NoOp,
            diff: None,
            archived: vec![],
            archive_failures: vec![],
        };

        let value = outcome_value(&outcome);
        assert_eq!(value["action"], "no-op");
        assert_eq!(value["changed"], json!([]));
    }
}
