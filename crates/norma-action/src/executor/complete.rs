//! COMPLETE handler: marks a document as completed.

use async_trait::async_trait;
use serde_json::json;

use norma_core::Timestamp;
use norma_store::DocumentStore;

use crate::error::ActionError;
use crate::executor::{require_entity_id, MutationHandler};
use crate::types::{ActionRequest, ActionType, ExecutionResult};

pub struct CompleteHandler;

#[async_trait]
impl MutationHandler for CompleteHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Complete
    }

    async fn execute(
        &self,
        store: &dyn DocumentStore,
        request: &ActionRequest,
    ) -> Result<ExecutionResult, ActionError> {
        let entity_id = require_entity_id(request)?;
        let now = Timestamp::now().0;

        store.update(
            request.entity.collection(),
            entity_id,
            json!({
                "status": "completed",
                "completedAt": now,
                "updatedAt": now,
            }),
        )?;

        tracing::info!(entity = %request.entity, id = %entity_id, "Document completed");

        Ok(ExecutionResult {
            success: true,
            message: format!("Marked {} {} as completed", request.entity, entity_id),
            data: None,
        })
    }
}
