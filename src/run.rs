//! One sync run: fetch, then reconcile against the store.

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::fetch::Source;
use crate::snapshot::Snapshot;
use crate::store::history::{FileNames, History, Reconciliation};
use crate::store::{JsonStore, MemoryStore, Store, StoreError, StoreResult};

/// Fetch the current playlist and persist whatever changed.
pub fn sync(
    source: &dyn Source,
    store: &dyn Store,
    names: &FileNames,
    keep_history: bool,
) -> Result<Reconciliation> {
    let current = fetch(source)?;
    Ok(History::new(store, names, keep_history).sync(&current)?)
}

/// Like `sync`, but every write goes to a scratch store and `store` is only read.
pub fn plan(
    source: &dyn Source,
    store: &dyn Store,
    names: &FileNames,
    keep_history: bool,
) -> Result<Reconciliation> {
    let current = fetch(source)?;
    let previous = History::new(store, names, keep_history).load_previous();

    let scratch = MemoryStore::new();
    Ok(History::new(&scratch, names, keep_history).reconcile(
        &current,
        previous.playlist,
        previous.diff,
    )?)
}

fn fetch(source: &dyn Source) -> Result<Snapshot> {
    let current = source.fetch_all()?;
    info!(source = source.name(), videos = current.len(), "fetched playlist");
    Ok(current)
}

/// Load a snapshot document from an arbitrary path.
pub fn load_file(path: &Path) -> StoreResult<Snapshot> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| StoreError::InvalidName(path.display().to_string()))?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    JsonStore::new(dir).load(name)
}
