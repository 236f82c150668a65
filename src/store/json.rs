//! File-backed snapshot store.
//!
//! Each document is a file directly under the store directory:
//! `playlist.json` -> `<dir>/playlist.json`.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{validate_name, Store, StoreError, StoreResult};
use crate::snapshot::Snapshot;

/// An archived document found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonStore { dir: dir.into() }
    }

    fn path_for(&self, name: &str) -> StoreResult<PathBuf> {
        validate_name(name)?;
        Ok(self.dir.join(name))
    }

    /// Archived copies of `base`, oldest first.
    pub fn archives(&self, base: &str) -> StoreResult<Vec<ArchiveEntry>> {
        let suffix = format!("_{base}");
        let mut found = Vec::new();

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(found),
            Err(e) => return Err(StoreError::Io(e)),
        };

        for entry in entries {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let Some(stamp) = name.strip_suffix(&suffix) else {
                continue;
            };
            // skip anything that merely ends in the base name
            if let Ok(captured_at) = DateTime::parse_from_rfc3339(stamp) {
                found.push(ArchiveEntry {
                    name,
                    captured_at: captured_at.with_timezone(&Utc),
                });
            }
        }

        found.sort_by_key(|a| a.captured_at);
        Ok(found)
    }
}

impl Store for JsonStore {
    fn load(&self, name: &str) -> StoreResult<Snapshot> {
        let path = self.path_for(name)?;
        debug!(path = %path.display(), "reading snapshot");

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_string()));
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        Ok(Snapshot::from_document(&content)?)
    }

    fn save(&self, name: &str, snapshot: &Snapshot) -> StoreResult<()> {
        let path = self.path_for(name)?;
        debug!(path = %path.display(), videos = snapshot.len(), "writing snapshot");

        fs::create_dir_all(&self.dir)?;
        let content = snapshot.to_document()?;

        // write to a sibling temp file, then rename over the live document
        let mut temp_name = path.clone().into_os_string();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        let path = self.path_for(name)?;
        debug!(path = %path.display(), "removing snapshot");

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Video;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn sample() -> Snapshot {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        Snapshot::at(vec![Video::new("abc", "First", at)], at)
    }

    #[test]
    fn save_and_load() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        store.save("playlist.json", &sample()).unwrap();
        assert_eq!(store.load("playlist.json").unwrap(), sample());
    }

    #[test]
    fn save_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested").join("state"));

        store.save("playlist.json", &sample()).unwrap();
        assert!(dir.path().join("nested/state/playlist.json").exists());
        assert!(!dir.path().join("nested/state/playlist.json.tmp").exists());
    }

    #[test]
    fn load_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let err = store.load("playlist.json").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn load_garbage_is_json_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("playlist.json"), "not json").unwrap();
        let store = JsonStore::new(dir.path());

        let err = store.load("playlist.json").unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn save_replaces_whole_document() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        store
            .save(
                "playlist.json",
                &Snapshot::at(
                    vec![Video::new("a", "A", at), Video::new("b", "B", at)],
                    at,
                ),
            )
            .unwrap();
        store.save("playlist.json", &sample()).unwrap();

        assert_eq!(store.load("playlist.json").unwrap().len(), 1);
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        store.save("diff.json", &sample()).unwrap();
        store.delete("diff.json").unwrap();
        store.delete("diff.json").unwrap();
        assert!(store.load("diff.json").unwrap_err().is_not_found());
    }

    #[test]
    fn invalid_names_are_rejected() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        assert!(store.save("../escape.json", &sample()).is_err());
        assert!(store.load("").is_err());
        assert!(store.delete("a/b").is_err());
    }

    #[test]
    fn archives_are_listed_oldest_first() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        store.save("2024-03-01T00:00:00Z_playlist.json", &sample()).unwrap();
        store.save("2024-01-01T00:00:00Z_playlist.json", &sample()).unwrap();
        store.save("2024-02-01T00:00:00Z_diff.json", &sample()).unwrap();
        store.save("playlist.json", &sample()).unwrap();
        store.save("backup_playlist.json", &sample()).unwrap();

        let archives = store.archives("playlist.json").unwrap();
        let names: Vec<&str> = archives.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "2024-01-01T00:00:00Z_playlist.json",
                "2024-03-01T00:00:00Z_playlist.json",
            ]
        );
    }

    #[test]
    fn archives_of_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nope"));
        assert!(store.archives("playlist.json").unwrap().is_empty());
    }
}
