//! Direct-action confirmation and execution engine for Norma.
//!
//! Lets a caller (typically an AI assistant) propose a mutation against a
//! quality-management record, requires an explicit human confirmation before
//! the mutation is applied, enforces role-based permissions, and records an
//! append-only audit trail of every lifecycle transition.

pub mod engine;
pub mod error;
pub mod executor;
pub mod permission;
pub mod store;
pub mod summary;
pub mod types;

pub use engine::ActionEngine;
pub use error::ActionError;
pub use executor::{ExecutorRegistry, MutationHandler};
pub use permission::{DocumentDirectory, PermissionResolver, StaticDirectory, UserDirectory};
pub use store::{AuditTrail, ConfirmationStore};
pub use summary::generate_summary;
pub use types::{
    ActionReceipt, ActionRequest, ActionType, AuditLogEntry, AuditStatus, ConfirmOutcome,
    Confirmation, Entity, ExecutionResult, Role,
};
