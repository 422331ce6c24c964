//! Error types for the direct-action engine.

use crate::types::ActionType;
use norma_core::NormaError;
use uuid::Uuid;

/// Errors raised by the engine and its mutation handlers.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The requester's role does not permit the proposed mutation.
    /// Raised before any state is persisted.
    #[error("User {user_id} does not have permission to perform {action_type} actions")]
    PermissionDenied {
        user_id: String,
        action_type: ActionType,
    },

    /// No confirmation exists for the given action id.
    #[error("Action not found: {0}")]
    NotFound(Uuid),

    /// Confirm/cancel attempted by a user other than the original requester.
    #[error("Only the requesting user may confirm or cancel this action")]
    Unauthorized,

    /// The confirmation already reached a terminal state.
    #[error("Action already resolved: {0}")]
    AlreadyResolved(Uuid),

    /// Invalid request contents discovered at execution time.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No handler registered for the requested action type.
    #[error("Action type not registered: {0}")]
    UnregisteredHandler(ActionType),

    /// Underlying persistence failure.
    #[error("Storage error: {0}")]
    Storage(#[from] NormaError),
}
