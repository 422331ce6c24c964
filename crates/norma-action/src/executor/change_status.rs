//! CHANGE_STATUS handler: moves a document to a new status.

use async_trait::async_trait;
use serde_json::json;

use norma_core::Timestamp;
use norma_store::DocumentStore;

use crate::error::ActionError;
use crate::executor::{require_data_field, require_entity_id, MutationHandler};
use crate::types::{ActionRequest, ActionType, ExecutionResult};

pub struct ChangeStatusHandler;

#[async_trait]
impl MutationHandler for ChangeStatusHandler {
    fn action_type(&self) -> ActionType {
        ActionType::ChangeStatus
    }

    async fn execute(
        &self,
        store: &dyn DocumentStore,
        request: &ActionRequest,
    ) -> Result<ExecutionResult, ActionError> {
        let entity_id = require_entity_id(request)?;
        let new_status = require_data_field(request, "newStatus")?;
        let now = Timestamp::now().0;

        store.update(
            request.entity.collection(),
            entity_id,
            json!({
                "status": new_status,
                "statusChangedAt": now,
                "updatedAt": now,
            }),
        )?;

        tracing::info!(
            entity = %request.entity,
            id = %entity_id,
            status = %new_status,
            "Document status changed"
        );

        Ok(ExecutionResult {
            success: true,
            message: format!(
                "Changed status of {} {} to {}",
                request.entity, entity_id, new_status
            ),
            data: None,
        })
    }
}
