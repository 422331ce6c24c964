//! DELETE handler: soft-deletes a document.
//!
//! Sets a `deleted` flag and timestamp; the document is never physically
//! removed.

use async_trait::async_trait;
use serde_json::json;

use norma_core::Timestamp;
use norma_store::DocumentStore;

use crate::error::ActionError;
use crate::executor::{require_entity_id, MutationHandler};
use crate::types::{ActionRequest, ActionType, ExecutionResult};

pub struct DeleteHandler;

#[async_trait]
impl MutationHandler for DeleteHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Delete
    }

    async fn execute(
        &self,
        store: &dyn DocumentStore,
        request: &ActionRequest,
    ) -> Result<ExecutionResult, ActionError> {
        let entity_id = require_entity_id(request)?;

        store.update(
            request.entity.collection(),
            entity_id,
            json!({
                "deleted": true,
                "deletedAt": Timestamp::now().0,
            }),
        )?;

        tracing::info!(entity = %request.entity, id = %entity_id, "Document soft-deleted");

        Ok(ExecutionResult {
            success: true,
            message: format!("Deleted {} {}", request.entity, entity_id),
            data: None,
        })
    }
}
