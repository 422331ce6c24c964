//! ASSIGN handler: sets the assignee of a document.

use async_trait::async_trait;
use serde_json::json;

use norma_core::Timestamp;
use norma_store::DocumentStore;

use crate::error::ActionError;
use crate::executor::{require_data_field, require_entity_id, MutationHandler};
use crate::types::{ActionRequest, ActionType, ExecutionResult};

pub struct AssignHandler;

#[async_trait]
impl MutationHandler for AssignHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Assign
    }

    async fn execute(
        &self,
        store: &dyn DocumentStore,
        request: &ActionRequest,
    ) -> Result<ExecutionResult, ActionError> {
        let entity_id = require_entity_id(request)?;
        let assignee = require_data_field(request, "assignedTo")?;
        let now = Timestamp::now().0;

        store.update(
            request.entity.collection(),
            entity_id,
            json!({
                "assignedTo": assignee,
                "assignedAt": now,
                "updatedAt": now,
            }),
        )?;

        tracing::info!(
            entity = %request.entity,
            id = %entity_id,
            assignee = %assignee,
            "Document assigned"
        );

        Ok(ExecutionResult {
            success: true,
            message: format!("Assigned {} {} to {}", request.entity, entity_id, assignee),
            data: None,
        })
    }
}
