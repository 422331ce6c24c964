//! The `Document` record and the store trait implemented by all backends.

use norma_core::Result;
use serde_json::Value;

/// A versioned JSON document as read from a collection.
///
/// The version counter starts at 1 on first write and increments on every
/// subsequent write. It is the guard value for `DocumentStore::update_if`.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: String,
    pub body: Value,
    pub version: u64,
}

/// Store-agnostic document persistence.
///
/// Semantics shared by all implementations:
/// - A document body is always a JSON object.
/// - `put` creates or fully replaces; `update` shallow-merges top-level keys
///   into an existing document and fails with `DocumentNotFound` if the
///   target is absent.
/// - `update_if` is the conditional variant: it applies the merge only when
///   the stored version equals `expected_version`, returning `false` on a
///   version mismatch. This is the primitive the engine uses to guard
///   one-way state transitions against concurrent writers.
/// - Each call is atomic with respect to the single document it touches;
///   there are no multi-document transactions.
pub trait DocumentStore: Send + Sync {
    /// Read a document by collection and id.
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Create or fully replace a document.
    fn put(&self, collection: &str, id: &str, body: Value) -> Result<()>;

    /// Shallow-merge `patch` into an existing document.
    fn update(&self, collection: &str, id: &str, patch: Value) -> Result<()>;

    /// Shallow-merge `patch` only if the stored version matches.
    ///
    /// Returns `Ok(false)` when the version differs (another writer won),
    /// without touching the document.
    fn update_if(
        &self,
        collection: &str,
        id: &str,
        expected_version: u64,
        patch: Value,
    ) -> Result<bool>;

    /// Return all documents in a collection whose body satisfies `predicate`.
    fn query(
        &self,
        collection: &str,
        predicate: &dyn Fn(&Value) -> bool,
    ) -> Result<Vec<Document>>;
}

/// Shallow-merge the top-level keys of `patch` into `body`.
///
/// Both values must be JSON objects; callers validate this before writing.
pub(crate) fn merge_into(body: &mut Value, patch: &Value) {
    if let (Some(target), Some(source)) = (body.as_object_mut(), patch.as_object()) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
}
