//! Mutation handler registry and trait definition.
//!
//! Each action type maps to one handler performing a single-document store
//! operation. Handlers validate their required request fields before
//! touching the store; there is no cross-document transaction or rollback.

pub mod assign;
pub mod change_status;
pub mod complete;
pub mod create;
pub mod delete;
pub mod update;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

use norma_store::DocumentStore;

use crate::error::ActionError;
use crate::types::{ActionRequest, ActionType, ExecutionResult};

/// A single mutating operation against the target entity's collection.
#[async_trait]
pub trait MutationHandler: Send + Sync {
    /// The action type this handler implements.
    fn action_type(&self) -> ActionType;

    /// Perform the mutation. Validation failures are raised before any
    /// store call.
    async fn execute(
        &self,
        store: &dyn DocumentStore,
        request: &ActionRequest,
    ) -> Result<ExecutionResult, ActionError>;
}

/// Registry dispatching action types to handler implementations.
pub struct ExecutorRegistry {
    handlers: HashMap<ActionType, Box<dyn MutationHandler>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, handler: Box<dyn MutationHandler>) {
        self.handlers.insert(handler.action_type(), handler);
    }

    /// Register the built-in handlers for all six action types.
    pub fn register_defaults(&mut self) {
        self.register(Box::new(create::CreateHandler));
        self.register(Box::new(update::UpdateHandler));
        self.register(Box::new(complete::CompleteHandler));
        self.register(Box::new(assign::AssignHandler));
        self.register(Box::new(change_status::ChangeStatusHandler));
        self.register(Box::new(delete::DeleteHandler));
    }

    pub fn get(&self, action_type: ActionType) -> Option<&dyn MutationHandler> {
        self.handlers.get(&action_type).map(|h| h.as_ref())
    }
}

impl Default for ExecutorRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }
}

/// Fail fast when the target document id is absent.
pub(crate) fn require_entity_id(request: &ActionRequest) -> Result<&str, ActionError> {
    request.entity_id.as_deref().ok_or_else(|| {
        ActionError::Validation(format!(
            "entityId is required for {} actions",
            request.action_type
        ))
    })
}

/// Fail fast when a required string field is missing from `data`.
pub(crate) fn require_data_field<'a>(
    request: &'a ActionRequest,
    field: &str,
) -> Result<&'a str, ActionError> {
    request
        .data
        .get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ActionError::Validation(format!(
                "data.{} is required for {} actions",
                field, request.action_type
            ))
        })
}

/// The mutation payload must be a JSON object to merge into a document.
pub(crate) fn data_object(request: &ActionRequest) -> Result<&Map<String, Value>, ActionError> {
    request
        .data
        .as_object()
        .ok_or_else(|| ActionError::Validation("data must be a JSON object".to_string()))
}
