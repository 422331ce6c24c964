//! End-to-end engine flows over a durable SQLite store with role lookup
//! through the users collection.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use norma_action::{
    ActionEngine, ActionError, ActionRequest, ActionType, AuditStatus, DocumentDirectory, Entity,
};
use norma_store::{DocumentStore, SqliteStore};

fn engine_with_users() -> (ActionEngine, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    store
        .put("users", "admin-1", json!({"name": "Alex", "role": "admin"}))
        .unwrap();
    store
        .put("users", "auditor-1", json!({"name": "Ana", "role": "auditor"}))
        .unwrap();
    store
        .put("users", "plain-1", json!({"name": "Pat"}))
        .unwrap();

    let directory = DocumentDirectory::new(Arc::clone(&store) as Arc<dyn DocumentStore>, "users");
    let engine = ActionEngine::with_defaults(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        Arc::new(directory),
    );
    (engine, store)
}

#[tokio::test]
async fn happy_path_complete_audit() {
    let (engine, store) = engine_with_users();
    store.put("audits", "AUD-001", json!({"status": "open"})).unwrap();

    let request =
        ActionRequest::new(ActionType::Complete, Entity::Audit).with_entity_id("AUD-001");
    let receipt = engine
        .create_action_request("admin-1", "session-1", request)
        .unwrap();
    assert_eq!(receipt.status, "pending_confirmation");

    let outcome = engine
        .confirm_and_execute(receipt.action_id, "admin-1", true)
        .await
        .unwrap();
    assert!(outcome.success);

    let doc = store.get("audits", "AUD-001").unwrap().unwrap();
    assert_eq!(doc.body["status"], "completed");

    let logs = engine.audit_logs("admin-1", None).unwrap();
    let statuses: Vec<AuditStatus> = logs
        .iter()
        .filter(|e| e.action_id == receipt.action_id)
        .map(|e| e.status)
        .collect();
    assert!(statuses.contains(&AuditStatus::Pending));
    assert!(statuses.contains(&AuditStatus::Executed));
}

#[tokio::test]
async fn user_without_elevated_role_cannot_create() {
    let (engine, _) = engine_with_users();

    // A record without a role field resolves to the base user role, which
    // may not propose CREATE.
    let err = engine
        .create_action_request(
            "plain-1",
            "session-1",
            ActionRequest::new(ActionType::Create, Entity::Audit),
        )
        .unwrap_err();
    assert!(err.to_string().contains("does not have permission"));
    assert!(engine.audit_logs("plain-1", None).unwrap().is_empty());
}

#[tokio::test]
async fn missing_user_record_is_denied() {
    let (engine, _) = engine_with_users();
    let err = engine
        .create_action_request(
            "ghost",
            "session-1",
            ActionRequest::new(ActionType::Update, Entity::Audit).with_entity_id("AUD-001"),
        )
        .unwrap_err();
    assert!(matches!(err, ActionError::PermissionDenied { .. }));
}

#[tokio::test]
async fn assign_without_assignee_fails_after_pending() {
    let (engine, _) = engine_with_users();

    let request = ActionRequest::new(ActionType::Assign, Entity::Audit)
        .with_entity_id("AUD-001")
        .with_data(json!({}));
    // Creation succeeds: validation happens only at execution.
    let receipt = engine
        .create_action_request("auditor-1", "session-1", request)
        .unwrap();

    let err = engine
        .confirm_and_execute(receipt.action_id, "auditor-1", true)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("assignedTo"));

    let failed: Vec<_> = engine
        .audit_logs("auditor-1", None)
        .unwrap()
        .into_iter()
        .filter(|e| e.action_id == receipt.action_id && e.status == AuditStatus::Failed)
        .collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].error.as_ref().unwrap().contains("assignedTo"));
}

#[tokio::test]
async fn only_the_requester_may_resolve() {
    let (engine, _) = engine_with_users();
    let receipt = engine
        .create_action_request(
            "admin-1",
            "session-1",
            ActionRequest::new(ActionType::Delete, Entity::Finding).with_entity_id("F-1"),
        )
        .unwrap();

    let err = engine
        .confirm_and_execute(receipt.action_id, "auditor-1", true)
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Unauthorized));

    // Still pending for the original requester.
    let pending = engine.pending_confirmations("admin-1").unwrap();
    assert!(pending.iter().any(|c| c.action_id == receipt.action_id));
}

#[tokio::test]
async fn cancellation_is_terminal() {
    let (engine, store) = engine_with_users();
    store.put("audits", "AUD-002", json!({"status": "open"})).unwrap();

    let receipt = engine
        .create_action_request(
            "admin-1",
            "session-1",
            ActionRequest::new(ActionType::Complete, Entity::Audit).with_entity_id("AUD-002"),
        )
        .unwrap();

    let outcome = engine
        .confirm_and_execute(receipt.action_id, "admin-1", false)
        .await
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "cancelled");

    // Re-confirming a resolved action is rejected, and the target was
    // never mutated.
    let err = engine
        .confirm_and_execute(receipt.action_id, "admin-1", true)
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::AlreadyResolved(_)));
    assert_eq!(
        store.get("audits", "AUD-002").unwrap().unwrap().body["status"],
        "open"
    );
}

#[tokio::test]
async fn audit_trail_has_one_pending_and_one_terminal_entry() {
    let (engine, store) = engine_with_users();
    store.put("audits", "AUD-003", json!({"status": "open"})).unwrap();

    let executed = engine
        .create_action_request(
            "admin-1",
            "session-1",
            ActionRequest::new(ActionType::Complete, Entity::Audit).with_entity_id("AUD-003"),
        )
        .unwrap();
    engine
        .confirm_and_execute(executed.action_id, "admin-1", true)
        .await
        .unwrap();

    let cancelled = engine
        .create_action_request(
            "admin-1",
            "session-1",
            ActionRequest::new(ActionType::Update, Entity::Audit)
                .with_entity_id("AUD-003")
                .with_data(json!({"scope": "wider"})),
        )
        .unwrap();
    engine
        .confirm_and_execute(cancelled.action_id, "admin-1", false)
        .await
        .unwrap();

    for (action_id, terminal) in [
        (executed.action_id, AuditStatus::Executed),
        (cancelled.action_id, AuditStatus::Cancelled),
    ] {
        let entries = engine.audit_logs_for_action(action_id).unwrap();
        assert_eq!(
            entries
                .iter()
                .filter(|e| e.status == AuditStatus::Pending)
                .count(),
            1
        );
        let terminals: Vec<AuditStatus> = entries
            .iter()
            .map(|e| e.status)
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminals, vec![terminal]);
    }
}

#[tokio::test]
async fn audit_logs_respect_limit() {
    let (engine, store) = engine_with_users();
    for i in 0..5 {
        let id = format!("AUD-{:03}", i);
        store.put("audits", &id, json!({"status": "open"})).unwrap();
        let receipt = engine
            .create_action_request(
                "admin-1",
                "session-1",
                ActionRequest::new(ActionType::Complete, Entity::Audit).with_entity_id(&id),
            )
            .unwrap();
        engine
            .confirm_and_execute(receipt.action_id, "admin-1", true)
            .await
            .unwrap();
    }

    assert_eq!(engine.audit_logs("admin-1", Some(3)).unwrap().len(), 3);
    assert_eq!(engine.audit_logs("admin-1", None).unwrap().len(), 10);
}

#[tokio::test]
async fn create_generates_target_document() {
    let (engine, store) = engine_with_users();

    let receipt = engine
        .create_action_request(
            "auditor-1",
            "session-1",
            ActionRequest::new(ActionType::Create, Entity::Finding)
                .with_data(json!({"severity": "major", "description": "label missing"})),
        )
        .unwrap();
    assert_eq!(receipt.summary, "Create new finding");

    let outcome = engine
        .confirm_and_execute(receipt.action_id, "auditor-1", true)
        .await
        .unwrap();
    let new_id = outcome.data.unwrap()["id"].as_str().unwrap().to_string();

    let doc = store.get("findings", &new_id).unwrap().unwrap();
    assert_eq!(doc.body["severity"], "major");
    assert!(doc.body["createdAt"].is_i64());
}

#[tokio::test]
async fn unknown_action_id_is_not_found() {
    let (engine, _) = engine_with_users();
    let err = engine
        .confirm_and_execute(Uuid::new_v4(), "admin-1", true)
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::NotFound(_)));
}
