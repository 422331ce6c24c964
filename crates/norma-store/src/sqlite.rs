//! SQLite-backed document store.
//!
//! Persists documents as JSON text in the generic `documents` table. The
//! conditional update is expressed as a guarded SQL UPDATE so that the
//! version check and the write are a single statement.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use rusqlite::OptionalExtension;
use serde_json::Value;

use norma_core::{NormaError, Result};

use crate::db::Database;
use crate::document::{merge_into, Document, DocumentStore};

/// Durable document store over a shared [`Database`].
pub struct SqliteStore {
    db: Arc<Database>,
}

impl SqliteStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Open a store backed by a database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(Arc::new(Database::new(path)?)))
    }

    /// Open a transient in-memory store (for testing).
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Arc::new(Database::in_memory()?)))
    }
}

fn parse_body(collection: &str, id: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| {
        NormaError::Storage(format!(
            "Corrupt document body {}/{}: {}",
            collection, id, e
        ))
    })
}

impl DocumentStore for SqliteStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.db.with_conn(|conn| {
            let row: Option<(String, i64)> = conn
                .query_row(
                    "SELECT body, version FROM documents WHERE collection = ?1 AND id = ?2",
                    rusqlite::params![collection, id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
                .map_err(|e| NormaError::Storage(format!("Failed to read document: {}", e)))?;

            match row {
                Some((raw, version)) => Ok(Some(Document {
                    id: id.to_string(),
                    body: parse_body(collection, id, &raw)?,
                    version: version as u64,
                })),
                None => Ok(None),
            }
        })
    }

    fn put(&self, collection: &str, id: &str, body: Value) -> Result<()> {
        if !body.is_object() {
            return Err(NormaError::Storage(
                "Document body must be a JSON object".to_string(),
            ));
        }
        let raw = serde_json::to_string(&body)?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents (collection, id, body, version, updated_at)
                 VALUES (?1, ?2, ?3, 1, ?4)
                 ON CONFLICT (collection, id)
                 DO UPDATE SET body = ?3, version = version + 1, updated_at = ?4",
                rusqlite::params![collection, id, raw, Utc::now().timestamp()],
            )
            .map_err(|e| NormaError::Storage(format!("Failed to write document: {}", e)))?;
            Ok(())
        })
    }

    fn update(&self, collection: &str, id: &str, patch: Value) -> Result<()> {
        self.db.with_conn(|conn| {
            let row: Option<String> = conn
                .query_row(
                    "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                    rusqlite::params![collection, id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| NormaError::Storage(format!("Failed to read document: {}", e)))?;

            let raw = row.ok_or_else(|| NormaError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

            let mut body = parse_body(collection, id, &raw)?;
            merge_into(&mut body, &patch);
            let merged = serde_json::to_string(&body)?;

            conn.execute(
                "UPDATE documents SET body = ?3, version = version + 1, updated_at = ?4
                 WHERE collection = ?1 AND id = ?2",
                rusqlite::params![collection, id, merged, Utc::now().timestamp()],
            )
            .map_err(|e| NormaError::Storage(format!("Failed to update document: {}", e)))?;
            Ok(())
        })
    }

    fn update_if(
        &self,
        collection: &str,
        id: &str,
        expected_version: u64,
        patch: Value,
    ) -> Result<bool> {
        self.db.with_conn(|conn| {
            let row: Option<(String, i64)> = conn
                .query_row(
                    "SELECT body, version FROM documents WHERE collection = ?1 AND id = ?2",
                    rusqlite::params![collection, id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
                .map_err(|e| NormaError::Storage(format!("Failed to read document: {}", e)))?;

            let (raw, version) = row.ok_or_else(|| NormaError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

            if version as u64 != expected_version {
                return Ok(false);
            }

            let mut body = parse_body(collection, id, &raw)?;
            merge_into(&mut body, &patch);
            let merged = serde_json::to_string(&body)?;

            // The WHERE clause re-checks the version so the guard also holds
            // against writers outside this process.
            let affected = conn
                .execute(
                    "UPDATE documents SET body = ?3, version = version + 1, updated_at = ?4
                     WHERE collection = ?1 AND id = ?2 AND version = ?5",
                    rusqlite::params![
                        collection,
                        id,
                        merged,
                        Utc::now().timestamp(),
                        expected_version as i64
                    ],
                )
                .map_err(|e| NormaError::Storage(format!("Failed to update document: {}", e)))?;
            Ok(affected == 1)
        })
    }

    fn query(
        &self,
        collection: &str,
        predicate: &dyn Fn(&Value) -> bool,
    ) -> Result<Vec<Document>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, body, version FROM documents WHERE collection = ?1")
                .map_err(|e| NormaError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![collection], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                })
                .map_err(|e| NormaError::Storage(format!("Failed to query documents: {}", e)))?;

            let mut result = Vec::new();
            for row in rows {
                let (id, raw, version) =
                    row.map_err(|e| NormaError::Storage(format!("Failed to read row: {}", e)))?;
                let body = parse_body(collection, &id, &raw)?;
                if predicate(&body) {
                    result.push(Document {
                        id,
                        body,
                        version: version as u64,
                    });
                }
            }
            Ok(result)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> SqliteStore {
        SqliteStore::in_memory().unwrap()
    }

    #[test]
    fn test_put_and_get() {
        let store = store();
        store.put("audits", "AUD-001", json!({"title": "Q3 audit"})).unwrap();

        let doc = store.get("audits", "AUD-001").unwrap().unwrap();
        assert_eq!(doc.id, "AUD-001");
        assert_eq!(doc.body["title"], "Q3 audit");
        assert_eq!(doc.version, 1);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = store();
        assert!(store.get("audits", "nope").unwrap().is_none());
    }

    #[test]
    fn test_put_replaces_and_bumps_version() {
        let store = store();
        store.put("audits", "AUD-001", json!({"a": 1})).unwrap();
        store.put("audits", "AUD-001", json!({"b": 2})).unwrap();

        let doc = store.get("audits", "AUD-001").unwrap().unwrap();
        assert_eq!(doc.body, json!({"b": 2}));
        assert_eq!(doc.version, 2);
    }

    #[test]
    fn test_put_rejects_non_object() {
        let store = store();
        assert!(store.put("audits", "AUD-001", json!("scalar")).is_err());
    }

    #[test]
    fn test_update_merges_existing() {
        let store = store();
        store.put("audits", "AUD-001", json!({"status": "open", "owner": "ana"})).unwrap();
        store.update("audits", "AUD-001", json!({"status": "closed"})).unwrap();

        let doc = store.get("audits", "AUD-001").unwrap().unwrap();
        assert_eq!(doc.body, json!({"status": "closed", "owner": "ana"}));
        assert_eq!(doc.version, 2);
    }

    #[test]
    fn test_update_missing_errors() {
        let store = store();
        let err = store.update("audits", "missing", json!({"a": 1})).unwrap_err();
        assert!(matches!(err, NormaError::DocumentNotFound { .. }));
    }

    #[test]
    fn test_update_if_guards_on_version() {
        let store = store();
        store.put("c", "x", json!({"state": "pending"})).unwrap();

        assert!(store.update_if("c", "x", 1, json!({"state": "done"})).unwrap());
        // Stale writer loses.
        assert!(!store.update_if("c", "x", 1, json!({"state": "again"})).unwrap());

        let doc = store.get("c", "x").unwrap().unwrap();
        assert_eq!(doc.body["state"], "done");
        assert_eq!(doc.version, 2);
    }

    #[test]
    fn test_update_if_missing_errors() {
        let store = store();
        let err = store.update_if("c", "x", 1, json!({})).unwrap_err();
        assert!(matches!(err, NormaError::DocumentNotFound { .. }));
    }

    #[test]
    fn test_query_filters_by_predicate() {
        let store = store();
        store.put("findings", "F1", json!({"severity": "major"})).unwrap();
        store.put("findings", "F2", json!({"severity": "minor"})).unwrap();
        store.put("findings", "F3", json!({"severity": "major"})).unwrap();

        let majors = store
            .query("findings", &|body| body["severity"] == "major")
            .unwrap();
        assert_eq!(majors.len(), 2);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("norma.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.put("audits", "AUD-001", json!({"title": "kept"})).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let doc = store.get("audits", "AUD-001").unwrap().unwrap();
        assert_eq!(doc.body["title"], "kept");
    }
}
