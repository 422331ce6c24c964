//! Core types and value objects for the direct-action engine.
//!
//! Defines action requests, confirmations, audit entries, and their
//! supporting enumerations. Persisted records serialize with camelCase
//! field names to stay compatible with the document-database conventions
//! of the surrounding application.

use norma_core::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Mutation kinds a caller may propose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Create,
    Update,
    Complete,
    Assign,
    ChangeStatus,
    Delete,
}

impl ActionType {
    pub const ALL: [ActionType; 6] = [
        ActionType::Create,
        ActionType::Update,
        ActionType::Complete,
        ActionType::Assign,
        ActionType::ChangeStatus,
        ActionType::Delete,
    ];
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Create => write!(f, "CREATE"),
            ActionType::Update => write!(f, "UPDATE"),
            ActionType::Complete => write!(f, "COMPLETE"),
            ActionType::Assign => write!(f, "ASSIGN"),
            ActionType::ChangeStatus => write!(f, "CHANGE_STATUS"),
            ActionType::Delete => write!(f, "DELETE"),
        }
    }
}

impl std::str::FromStr for ActionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(ActionType::Create),
            "UPDATE" => Ok(ActionType::Update),
            "COMPLETE" => Ok(ActionType::Complete),
            "ASSIGN" => Ok(ActionType::Assign),
            "CHANGE_STATUS" => Ok(ActionType::ChangeStatus),
            "DELETE" => Ok(ActionType::Delete),
            _ => Err(format!("Unknown action type: {}", s)),
        }
    }
}

/// Domain entity kinds targetable by a mutation.
///
/// This is a closed set: every variant maps exhaustively to a storage
/// collection, so an unrecognized entity kind fails at parse time instead
/// of silently becoming a collection name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Entity {
    Audit,
    Finding,
    Action,
    NonConformity,
    ProcessRecord,
    Personnel,
    Training,
    Evaluation,
}

impl Entity {
    /// Storage collection backing this entity kind.
    pub fn collection(&self) -> &'static str {
        match self {
            Entity::Audit => "audits",
            Entity::Finding => "findings",
            Entity::Action => "actions",
            Entity::NonConformity => "non_conformities",
            Entity::ProcessRecord => "process_records",
            Entity::Personnel => "personnel",
            Entity::Training => "trainings",
            Entity::Evaluation => "evaluations",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Audit => write!(f, "audit"),
            Entity::Finding => write!(f, "finding"),
            Entity::Action => write!(f, "action"),
            Entity::NonConformity => write!(f, "non-conformity"),
            Entity::ProcessRecord => write!(f, "process-record"),
            Entity::Personnel => write!(f, "personnel"),
            Entity::Training => write!(f, "training"),
            Entity::Evaluation => write!(f, "evaluation"),
        }
    }
}

impl std::str::FromStr for Entity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audit" => Ok(Entity::Audit),
            "finding" => Ok(Entity::Finding),
            "action" => Ok(Entity::Action),
            "non-conformity" => Ok(Entity::NonConformity),
            "process-record" => Ok(Entity::ProcessRecord),
            "personnel" => Ok(Entity::Personnel),
            "training" => Ok(Entity::Training),
            "evaluation" => Ok(Entity::Evaluation),
            _ => Err(format!("Unknown entity: {}", s)),
        }
    }
}

/// Roles recognized by the permission resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Auditor,
    Manager,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Auditor => write!(f, "auditor"),
            Role::Manager => write!(f, "manager"),
            Role::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "auditor" => Ok(Role::Auditor),
            "manager" => Ok(Role::Manager),
            "user" => Ok(Role::User),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Audit trail lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Pending,
    Confirmed,
    Executed,
    Failed,
    Cancelled,
}

impl AuditStatus {
    /// Terminal states permit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AuditStatus::Executed | AuditStatus::Failed | AuditStatus::Cancelled
        )
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditStatus::Pending => write!(f, "pending"),
            AuditStatus::Confirmed => write!(f, "confirmed"),
            AuditStatus::Executed => write!(f, "executed"),
            AuditStatus::Failed => write!(f, "failed"),
            AuditStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for AuditStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AuditStatus::Pending),
            "confirmed" => Ok(AuditStatus::Confirmed),
            "executed" => Ok(AuditStatus::Executed),
            "failed" => Ok(AuditStatus::Failed),
            "cancelled" => Ok(AuditStatus::Cancelled),
            _ => Err(format!("Unknown audit status: {}", s)),
        }
    }
}

// =============================================================================
// Domain Structs
// =============================================================================

fn default_true() -> bool {
    true
}

/// A caller-supplied mutation proposal. Immutable once submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub entity: Entity,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default = "default_true")]
    pub requires_confirmation: bool,
}

impl ActionRequest {
    pub fn new(action_type: ActionType, entity: Entity) -> Self {
        Self {
            action_type,
            entity,
            entity_id: None,
            data: Value::Object(serde_json::Map::new()),
            reason: None,
            requires_confirmation: true,
        }
    }

    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Result of a successfully executed mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// The durable record tracking one action from proposal to terminal outcome.
///
/// Invariants: `confirmed` transitions false -> true exactly once; exactly
/// one of `result`/`error` is populated once terminal; no field changes
/// after `executed_at` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub action_id: Uuid,
    pub user_id: String,
    pub session_id: String,
    pub request: ActionRequest,
    pub summary: String,
    pub confirmed: bool,
    pub created_at: Timestamp,
    #[serde(default)]
    pub confirmed_at: Option<Timestamp>,
    #[serde(default)]
    pub executed_at: Option<Timestamp>,
    #[serde(default)]
    pub result: Option<ExecutionResult>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Confirmation {
    pub fn new(
        action_id: Uuid,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        request: ActionRequest,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            action_id,
            user_id: user_id.into(),
            session_id: session_id.into(),
            request,
            summary: summary.into(),
            confirmed: false,
            created_at: Timestamp::now(),
            confirmed_at: None,
            executed_at: None,
            result: None,
            error: None,
        }
    }
}

/// One append-only audit trail row, one per lifecycle transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub user_id: String,
    pub action_id: Uuid,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub entity: Entity,
    #[serde(default)]
    pub entity_id: Option<String>,
    pub status: AuditStatus,
    pub request: ActionRequest,
    pub summary: String,
    #[serde(default)]
    pub result: Option<ExecutionResult>,
    #[serde(default)]
    pub error: Option<String>,
    pub timestamp: Timestamp,
}

impl AuditLogEntry {
    /// Build an entry snapshotting the confirmation at a transition.
    pub fn from_confirmation(confirmation: &Confirmation, status: AuditStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: confirmation.user_id.clone(),
            action_id: confirmation.action_id,
            action_type: confirmation.request.action_type,
            entity: confirmation.request.entity,
            entity_id: confirmation.request.entity_id.clone(),
            status,
            request: confirmation.request.clone(),
            summary: confirmation.summary.clone(),
            result: None,
            error: None,
            timestamp: Timestamp::now(),
        }
    }

    pub fn with_result(mut self, result: ExecutionResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Returned by `create_action_request`: the mutation has not happened yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReceipt {
    pub action_id: Uuid,
    pub status: String,
    pub summary: String,
    pub requires_confirmation: bool,
}

/// Returned by `confirm_and_execute` on the non-raising paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmOutcome {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

// =============================================================================
// Tests
// =============================================================================
