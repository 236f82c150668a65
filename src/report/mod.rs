pub mod json;
pub mod table;

use crate::store::history::{Action, Reconciliation};

/// One-line description of what a run did, or would do when `dry_run` is set.
pub fn summary(outcome: &Reconciliation, dry_run: bool) -> String {
    let verb = |done: &'static str, planned: &'static str| if dry_run { planned } else { done };

    let changed = outcome.diff.as_ref().map_or(0, |d| d.len());
    match outcome.action {
        Action::Initialize => format!(
            "No stored playlist: {} a new one.",
            verb("created", "would create")
        ),
        Action::NoOp => String::from("No diff and no new videos, nothing to do."),
        Action::ReplacePlaylistOnly => format!(
            "Playlist size changed with no reportable videos: playlist {}.",
            verb("replaced", "would be replaced")
        ),
        Action::ReplacePlaylistAndDiff => format!(
            "{changed} changed video(s): playlist and diff {}.",
            verb("replaced", "would be replaced")
        ),
    }
}

pub fn print_outcome(outcome: &Reconciliation, dry_run: bool, as_json: bool) {
    if as_json {
        println!("{}", json::render_outcome(outcome));
        return;
    }

    println!("{}", summary(outcome, dry_run));

    if let Some(diff) = &outcome.diff {
        print!("{}", table::render_diff(diff));
    }

    for name in &outcome.archived {
        if dry_run {
            println!("would archive: {name}");
        } else {
            println!("archived: {name}");
        }
    }

    if !outcome.archive_failures.is_empty() {
        eprintln!("\nhistory could not be fully archived:");
        for failure in &outcome.archive_failures {
            eprintln!("  {failure}");
        }
    }
}
