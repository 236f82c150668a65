use std::cell::RefCell;
use std::fs;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use playlist_diff::fetch::{FetchError, Source};
use playlist_diff::run;
use playlist_diff::snapshot::{Snapshot, Video};
use playlist_diff::store::history::{Action, FileNames};
use playlist_diff::store::{JsonStore, Store};

/// Serves a queue of playlists, one per run.
struct Scripted {
    runs: RefCell<Vec<Vec<Video>>>,
}

impl Scripted {
    fn new(runs: Vec<Vec<Video>>) -> Self {
        Scripted {
            runs: RefCell::new(runs.into_iter().rev().collect()),
        }
    }
}

impl Source for Scripted {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn fetch_all(&self) -> Result<Snapshot, FetchError> {
        let videos = self
            .runs
            .borrow_mut()
            .pop()
            .ok_or_else(|| FetchError::Malformed("no more runs".into()))?;
        Ok(Snapshot::new(videos))
    }
}

fn video(id: &str, title: &str) -> Video {
    Video::new(id, title, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
}

fn names() -> FileNames {
    FileNames::new("playlist.json", "diff.json")
}

fn files(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn first_run_then_new_video_without_history() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path());
    let source = Scripted::new(vec![
        vec![video("1", "A")],
        vec![video("1", "A"), video("2", "B")],
    ]);

    let first = run::sync(&source, &store, &names(), false).unwrap();
    assert_eq!(first.action, Action::Initialize);
    assert_eq!(files(&dir), vec!["playlist.json"]);

    let second = run::sync(&source, &store, &names(), false).unwrap();
    assert_eq!(second.action, Action::ReplacePlaylistAndDiff);
    assert_eq!(second.diff.as_ref().unwrap().videos(), &[video("2", "B")]);
    assert!(second.archived.is_empty());
    assert_eq!(files(&dir), vec!["diff.json", "playlist.json"]);

    let stored_diff = store.load("diff.json").unwrap();
    assert_eq!(stored_diff.videos(), &[video("2", "B")]);
}

#[test]
fn history_keeps_byte_identical_archives() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path());

    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let t0_diff = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 5).unwrap();
    store
        .save("playlist.json", &Snapshot::at(vec![video("1", "A"), video("2", "B")], t0))
        .unwrap();
    store
        .save("diff.json", &Snapshot::at(vec![video("2", "B")], t0_diff))
        .unwrap();
    let previous_bytes = fs::read(dir.path().join("playlist.json")).unwrap();
    let previous_diff_bytes = fs::read(dir.path().join("diff.json")).unwrap();

    let source = Scripted::new(vec![vec![
        video("1", "A"),
        video("2", "Deleted video"),
    ]]);
    let outcome = run::sync(&source, &store, &names(), true).unwrap();

    assert_eq!(outcome.action, Action::ReplacePlaylistAndDiff);
    assert!(outcome.archive_failures.is_empty());
    assert_eq!(
        files(&dir),
        vec![
            "2024-01-01T00:00:00Z_playlist.json",
            "2024-01-01T00:00:05Z_diff.json",
            "diff.json",
            "playlist.json",
        ]
    );

    let archived = fs::read(dir.path().join("2024-01-01T00:00:00Z_playlist.json")).unwrap();
    assert_eq!(archived, previous_bytes);
    let archived_diff = fs::read(dir.path().join("2024-01-01T00:00:05Z_diff.json")).unwrap();
    assert_eq!(archived_diff, previous_diff_bytes);

    let live_diff = fs::read(dir.path().join("diff.json")).unwrap();
    assert_ne!(live_diff, archived_diff);
    assert_eq!(
        store.load("diff.json").unwrap().videos(),
        &[video("2", "Deleted video")]
    );

    let archives = store.archives("playlist.json").unwrap();
    assert_eq!(archives.len(), 1);
    assert_eq!(archives[0].captured_at, t0);
}

#[test]
fn shrinkage_replaces_playlist_and_archives() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path());
    let t0 = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
    store
        .save("playlist.json", &Snapshot::at(vec![video("a", "A"), video("b", "B")], t0))
        .unwrap();

    let source = Scripted::new(vec![vec![video("a", "A")]]);
    let outcome = run::sync(&source, &store, &names(), true).unwrap();

    assert_eq!(outcome.action, Action::ReplacePlaylistOnly);
    assert!(outcome.diff.is_none());
    assert_eq!(
        files(&dir),
        vec!["2024-02-01T12:00:00Z_playlist.json", "playlist.json"]
    );
    assert_eq!(store.load("playlist.json").unwrap().len(), 1);
}

#[test]
fn unchanged_playlist_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path());
    let t0 = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
    store
        .save("playlist.json", &Snapshot::at(vec![video("a", "A")], t0))
        .unwrap();
    let before = fs::read(dir.path().join("playlist.json")).unwrap();

    let source = Scripted::new(vec![vec![video("a", "A (remastered)")]]);
    let outcome = run::sync(&source, &store, &names(), true).unwrap();

    assert_eq!(outcome.action, Action::NoOp);
    assert_eq!(files(&dir), vec!["playlist.json"]);
    assert_eq!(fs::read(dir.path().join("playlist.json")).unwrap(), before);
}

#[test]
fn legacy_null_diff_is_neither_archived_nor_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("playlist.json"),
        r#"{"videos": [{"title": "A", "videoId": "a", "publishedAt": "2023-01-01T00:00:00Z"}],
            "updatedAt": "2024-03-01T00:00:00Z"}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("diff.json"),
        r#"{"videos": null, "updatedAt": "2024-03-01T00:00:00Z"}"#,
    )
    .unwrap();
    let store = JsonStore::new(dir.path());

    let source = Scripted::new(vec![vec![video("a", "A"), video("b", "B")]]);
    let outcome = run::sync(&source, &store, &names(), true).unwrap();

    assert_eq!(outcome.action, Action::ReplacePlaylistAndDiff);
    assert_eq!(
        outcome.archived,
        vec!["2024-03-01T00:00:00Z_playlist.json".to_string()]
    );
    assert_eq!(store.load("diff.json").unwrap().videos(), &[video("b", "B")]);
}
