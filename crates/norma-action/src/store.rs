//! Persistence adapters for confirmations and the audit trail.
//!
//! Both sit on top of the store-agnostic `DocumentStore`. Confirmations are
//! mutable until terminal; audit entries are append-only and never touched
//! again after the initial write.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use norma_core::NormaError;
use norma_store::DocumentStore;

use crate::error::ActionError;
use crate::types::{AuditLogEntry, Confirmation};

/// Adapter for the confirmation collection.
pub struct ConfirmationStore {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl ConfirmationStore {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Persist a freshly created confirmation.
    pub fn create(&self, confirmation: &Confirmation) -> Result<(), ActionError> {
        let body = serde_json::to_value(confirmation).map_err(NormaError::from)?;
        self.store
            .put(&self.collection, &confirmation.action_id.to_string(), body)?;
        Ok(())
    }

    /// Load a confirmation together with its document version.
    ///
    /// The version is the guard value for [`resolve`](Self::resolve).
    pub fn load(&self, action_id: Uuid) -> Result<Option<(Confirmation, u64)>, ActionError> {
        let doc = self.store.get(&self.collection, &action_id.to_string())?;
        match doc {
            Some(doc) => {
                let confirmation: Confirmation =
                    serde_json::from_value(doc.body).map_err(NormaError::from)?;
                Ok(Some((confirmation, doc.version)))
            }
            None => Ok(None),
        }
    }

    /// Perform the one-way `confirmed: false -> true` transition.
    ///
    /// Guarded by the document version read alongside the confirmation, so
    /// a concurrent resolver loses with `AlreadyResolved` instead of
    /// double-executing or double-cancelling.
    pub fn resolve(
        &self,
        action_id: Uuid,
        expected_version: u64,
        patch: Value,
    ) -> Result<(), ActionError> {
        let applied =
            self.store
                .update_if(&self.collection, &action_id.to_string(), expected_version, patch)?;
        if applied {
            Ok(())
        } else {
            Err(ActionError::AlreadyResolved(action_id))
        }
    }

    /// Record the execution outcome on a confirmation this caller already
    /// resolved. Unconditional merge; only reachable after `resolve` won.
    pub fn record_outcome(&self, action_id: Uuid, patch: Value) -> Result<(), ActionError> {
        self.store
            .update(&self.collection, &action_id.to_string(), patch)?;
        Ok(())
    }

    /// All unresolved confirmations belonging to `user_id`.
    pub fn pending_for(&self, user_id: &str) -> Result<Vec<Confirmation>, ActionError> {
        let docs = self.store.query(&self.collection, &|body| {
            body["confirmed"] == false && body["userId"] == user_id
        })?;

        let mut pending = Vec::with_capacity(docs.len());
        for doc in docs {
            let confirmation: Confirmation =
                serde_json::from_value(doc.body).map_err(NormaError::from)?;
            pending.push(confirmation);
        }
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pending)
    }
}

/// Adapter for the append-only audit trail collection.
pub struct AuditTrail {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl AuditTrail {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Append one lifecycle entry. Entries are never updated or deleted.
    pub fn append(&self, entry: &AuditLogEntry) -> Result<(), ActionError> {
        let body = serde_json::to_value(entry).map_err(NormaError::from)?;
        self.store.put(&self.collection, &entry.id.to_string(), body)?;
        Ok(())
    }

    /// A user's audit entries, newest first, truncated to `limit`.
    pub fn for_user(&self, user_id: &str, limit: usize) -> Result<Vec<AuditLogEntry>, ActionError> {
        let docs = self
            .store
            .query(&self.collection, &|body| body["userId"] == user_id)?;

        let mut entries = Vec::with_capacity(docs.len());
        for doc in docs {
            let entry: AuditLogEntry =
                serde_json::from_value(doc.body).map_err(NormaError::from)?;
            entries.push(entry);
        }
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        Ok(entries)
    }

    /// All entries for one action id (for invariant checks and tooling).
    pub fn for_action(&self, action_id: Uuid) -> Result<Vec<AuditLogEntry>, ActionError> {
        let id = action_id.to_string();
        let docs = self
            .store
            .query(&self.collection, &|body| body["actionId"] == id.as_str())?;

        let mut entries = Vec::with_capacity(docs.len());
        for doc in docs {
            let entry: AuditLogEntry =
                serde_json::from_value(doc.body).map_err(NormaError::from)?;
            entries.push(entry);
        }
        entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(entries)
    }
}
