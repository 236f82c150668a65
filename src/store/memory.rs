//! In-memory snapshot store for tests and dry runs.
//!
//! Documents are kept encoded, exactly as `JsonStore` would write them.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{validate_name, Store, StoreError, StoreResult};
use crate::snapshot::Snapshot;

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing documents.
    pub fn with(documents: &[(&str, &Snapshot)]) -> StoreResult<Self> {
        let store = Self::new();
        for (name, snapshot) in documents {
            store.save(name, snapshot)?;
        }
        Ok(store)
    }

    /// Raw encoded document, if present.
    pub fn raw(&self, name: &str) -> Option<String> {
        self.documents.read().ok()?.get(name).cloned()
    }

    /// Names of every stored document, sorted.
    pub fn names(&self) -> Vec<String> {
        self.documents
            .read()
            .map(|docs| docs.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Store for MemoryStore {
    fn load(&self, name: &str) -> StoreResult<Snapshot> {
        validate_name(name)?;
        let docs = self
            .documents
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;

        let content = docs
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        Ok(Snapshot::from_document(content)?)
    }

    fn save(&self, name: &str, snapshot: &Snapshot) -> StoreResult<()> {
        validate_name(name)?;
        let content = snapshot.to_document()?;
        self.documents
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?
            .insert(name.to_string(), content);
        Ok(())
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        validate_name(name)?;
        self.documents
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?
            .remove(name);
        Ok(())
    }
}
