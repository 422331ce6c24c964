//! Role-based permission resolution.
//!
//! Maps (user, requested mutation kind) to allow/deny using a static
//! role table. Pure lookup, no side effects.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use norma_store::DocumentStore;

use crate::types::{ActionType, Role};

/// Collaborator seam for role lookup.
///
/// Returns `None` when no user record exists; a user that exists but
/// carries no (or an unrecognized) role maps to `Role::User`.
pub trait UserDirectory: Send + Sync {
    fn role_of(&self, user_id: &str) -> Option<Role>;
}

/// Fixed in-memory directory, used in tests and embedded setups.
pub struct StaticDirectory {
    roles: HashMap<String, Role>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self {
            roles: HashMap::new(),
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>, role: Role) -> Self {
        self.roles.insert(user_id.into(), role);
        self
    }
}

impl Default for StaticDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory for StaticDirectory {
    fn role_of(&self, user_id: &str) -> Option<Role> {
        self.roles.get(user_id).copied()
    }
}

/// Directory reading user records from a document store collection.
///
/// A record without a `role` field, or with one that does not parse,
/// defaults to `Role::User`. A missing record yields `None` (deny).
pub struct DocumentDirectory {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl DocumentDirectory {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }
}

impl UserDirectory for DocumentDirectory {
    fn role_of(&self, user_id: &str) -> Option<Role> {
        let doc = self.store.get(&self.collection, user_id).ok().flatten()?;
        let role = doc
            .body
            .get("role")
            .and_then(|v| v.as_str())
            .and_then(|s| Role::from_str(s).ok())
            .unwrap_or(Role::User);
        Some(role)
    }
}

impl Role {
    /// Static role -> allowed-mutation table. Admin passes unconditionally;
    /// DELETE is admin-only.
    pub fn permits(&self, action_type: ActionType) -> bool {
        match self {
            Role::Admin => true,
            Role::Auditor => matches!(
                action_type,
                ActionType::Create
                    | ActionType::Update
                    | ActionType::Complete
                    | ActionType::Assign
                    | ActionType::ChangeStatus
            ),
            Role::Manager => matches!(
                action_type,
                ActionType::Update
                    | ActionType::Complete
                    | ActionType::Assign
                    | ActionType::ChangeStatus
            ),
            Role::User => matches!(action_type, ActionType::Update | ActionType::Complete),
        }
    }
}

/// Resolves whether a user may propose a given mutation.
pub struct PermissionResolver {
    directory: Arc<dyn UserDirectory>,
}

impl PermissionResolver {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Unknown users are denied rather than raising.
    pub fn allows(&self, user_id: &str, action_type: ActionType) -> bool {
        match self.directory.role_of(user_id) {
            Some(role) => role.permits(action_type),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use norma_store::MemoryStore;
    use serde_json::json;

    fn resolver_with(user_id: &str, role: Role) -> PermissionResolver {
        PermissionResolver::new(Arc::new(StaticDirectory::new().with_user(user_id, role)))
    }

    #[test]
    fn test_admin_permits_everything() {
        let resolver = resolver_with("a", Role::Admin);
        for action_type in ActionType::ALL {
            assert!(resolver.allows("a", action_type));
        }
    }

    #[test]
    fn test_auditor_table() {
        let resolver = resolver_with("a", Role::Auditor);
        assert!(resolver.allows("a", ActionType::Create));
        assert!(resolver.allows("a", ActionType::Update));
        assert!(resolver.allows("a", ActionType::Complete));
        assert!(resolver.allows("a", ActionType::Assign));
        assert!(resolver.allows("a", ActionType::ChangeStatus));
        assert!(!resolver.allows("a", ActionType::Delete));
    }

    #[test]
    fn test_manager_table() {
        let resolver = resolver_with("m", Role::Manager);
        assert!(!resolver.allows("m", ActionType::Create));
        assert!(resolver.allows("m", ActionType::Update));
        assert!(resolver.allows("m", ActionType::Complete));
        assert!(resolver.allows("m", ActionType::Assign));
        assert!(resolver.allows("m", ActionType::ChangeStatus));
        assert!(!resolver.allows("m", ActionType::Delete));
    }

    #[test]
    fn test_user_table() {
        let resolver = resolver_with("u", Role::User);
        assert!(!resolver.allows("u", ActionType::Create));
        assert!(resolver.allows("u", ActionType::Update));
        assert!(resolver.allows("u", ActionType::Complete));
        assert!(!resolver.allows("u", ActionType::Assign));
        assert!(!resolver.allows("u", ActionType::ChangeStatus));
        assert!(!resolver.allows("u", ActionType::Delete));
    }

    #[test]
    fn test_delete_is_admin_only() {
        for role in [Role::Auditor, Role::Manager, Role::User] {
            assert!(!role.permits(ActionType::Delete));
        }
        assert!(Role::Admin.permits(ActionType::Delete));
    }

    #[test]
    fn test_unknown_user_is_denied() {
        let resolver = resolver_with("known", Role::Admin);
        assert!(!resolver.allows("stranger", ActionType::Update));
    }

    // ---- DocumentDirectory ----

    #[test]
    fn test_document_directory_reads_role() {
        let store = Arc::new(MemoryStore::new());
        store
            .put("users", "ana", json!({"name": "Ana", "role": "auditor"}))
            .unwrap();
        let directory = DocumentDirectory::new(store, "users");
        assert_eq!(directory.role_of("ana"), Some(Role::Auditor));
    }

    #[test]
    fn test_document_directory_missing_role_defaults_to_user() {
        let store = Arc::new(MemoryStore::new());
        store.put("users", "bo", json!({"name": "Bo"})).unwrap();
        store
            .put("users", "cy", json!({"name": "Cy", "role": "superuser"}))
            .unwrap();
        let directory = DocumentDirectory::new(store, "users");
        assert_eq!(directory.role_of("bo"), Some(Role::User));
        // Unrecognized role string also falls back to user.
        assert_eq!(directory.role_of("cy"), Some(Role::User));
    }

    #[test]
    fn test_document_directory_missing_record_is_none() {
        let store = Arc::new(MemoryStore::new());
        let directory = DocumentDirectory::new(store, "users");
        assert_eq!(directory.role_of("ghost"), None);
    }
}
