//! In-memory document store.
//!
//! Backs tests and embedded deployments that do not need durability.
//! Mirrors the SQLite backend's semantics exactly, including version
//! counters and conditional updates.

use std::collections::HashMap;
use std::sync::Mutex;

use norma_core::{NormaError, Result};
use serde_json::Value;

use crate::document::{merge_into, Document, DocumentStore};

/// Thread-safe in-memory store: collection name -> id -> document.
pub struct MemoryStore {
    collections: Mutex<HashMap<String, HashMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, HashMap<String, Document>>>> {
        self.collections
            .lock()
            .map_err(|e| NormaError::Storage(format!("Lock poisoned: {}", e)))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    fn put(&self, collection: &str, id: &str, body: Value) -> Result<()> {
        if !body.is_object() {
            return Err(NormaError::Storage(
                "Document body must be a JSON object".to_string(),
            ));
        }
        let mut collections = self.lock()?;
        let docs = collections.entry(collection.to_string()).or_default();
        let version = docs.get(id).map(|d| d.version + 1).unwrap_or(1);
        docs.insert(
            id.to_string(),
            Document {
                id: id.to_string(),
                body,
                version,
            },
        );
        Ok(())
    }

    fn update(&self, collection: &str, id: &str, patch: Value) -> Result<()> {
        let mut collections = self.lock()?;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| NormaError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        merge_into(&mut doc.body, &patch);
        doc.version += 1;
        Ok(())
    }

    fn update_if(
        &self,
        collection: &str,
        id: &str,
        expected_version: u64,
        patch: Value,
    ) -> Result<bool> {
        let mut collections = self.lock()?;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| NormaError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        if doc.version != expected_version {
            return Ok(false);
        }
        merge_into(&mut doc.body, &patch);
        doc.version += 1;
        Ok(true)
    }

    fn query(
        &self,
        collection: &str,
        predicate: &dyn Fn(&Value) -> bool,
    ) -> Result<Vec<Document>> {
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|d| predicate(&d.body))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
