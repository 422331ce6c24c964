//! UPDATE handler: merges the request payload into an existing document.

use async_trait::async_trait;
use serde_json::Value;

use norma_core::Timestamp;
use norma_store::DocumentStore;

use crate::error::ActionError;
use crate::executor::{data_object, require_entity_id, MutationHandler};
use crate::types::{ActionRequest, ActionType, ExecutionResult};

pub struct UpdateHandler;

#[async_trait]
impl MutationHandler for UpdateHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Update
    }

    async fn execute(
        &self,
        store: &dyn DocumentStore,
        request: &ActionRequest,
    ) -> Result<ExecutionResult, ActionError> {
        let entity_id = require_entity_id(request)?;
        let mut patch = data_object(request)?.clone();
        patch.insert("updatedAt".to_string(), Timestamp::now().0.into());

        store.update(request.entity.collection(), entity_id, Value::Object(patch))?;

        tracing::info!(entity = %request.entity, id = %entity_id, "Document updated");

        Ok(ExecutionResult {
            success: true,
            message: format!("Updated {} {}", request.entity, entity_id),
            data: None,
        })
    }
}
