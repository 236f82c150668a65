//! Snapshot storage.
//!
//! Persists snapshots as named JSON documents:
//! - the live playlist and live diff under their configured filenames
//! - archived copies under `<RFC3339 capture time>_<filename>`
//!
//! Supports:
//! - Whole-document load, save and idempotent delete
//! - Diffing two snapshots (`diff`)
//! - Deciding and executing what a run persists (`history`)

pub mod diff;
pub mod error;
pub mod history;
pub mod json;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::snapshot::Snapshot;

/// A place snapshot documents live.
pub trait Store {
    /// Load a named document. Fails with `StoreError::NotFound` when absent.
    fn load(&self, name: &str) -> StoreResult<Snapshot>;

    /// Replace a named document with `snapshot`.
    fn save(&self, name: &str, snapshot: &Snapshot) -> StoreResult<()>;

    /// Remove a named document. Removing a missing document is not an error.
    fn delete(&self, name: &str) -> StoreResult<()>;
}

/// Document names are single path components.
pub(crate) fn validate_name(name: &str) -> StoreResult<()> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name == "."
        || name == ".."
    {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}
