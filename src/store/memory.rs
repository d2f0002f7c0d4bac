//! In-memory store.

use std::collections::HashMap;

use super::Store;
use crate::error::Result;
use crate::models::Entity;

/// A store backed by a map, for tests and one-off reports.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw JSON under `key`.
    pub fn insert_raw(&mut self, key: impl Into<String>, json: impl Into<String>) {
        self.entries.insert(key.into(), json.into());
    }

    /// Serialize `items` under their entity key.
    pub fn insert<E: Entity>(&mut self, items: &[E]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.insert_raw(E::KEY, json);
        Ok(())
    }
}

impl Store for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }
}
