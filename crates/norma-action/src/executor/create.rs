//! CREATE handler: writes a new document into the entity's collection.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use norma_core::Timestamp;
use norma_store::DocumentStore;

use crate::error::ActionError;
use crate::executor::{data_object, MutationHandler};
use crate::types::{ActionRequest, ActionType, ExecutionResult};

pub struct CreateHandler;

#[async_trait]
impl MutationHandler for CreateHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Create
    }

    async fn execute(
        &self,
        store: &dyn DocumentStore,
        request: &ActionRequest,
    ) -> Result<ExecutionResult, ActionError> {
        let mut body = data_object(request)?.clone();
        let now = Timestamp::now().0;
        body.insert("createdAt".to_string(), now.into());
        body.insert("updatedAt".to_string(), now.into());

        let id = Uuid::new_v4().to_string();
        store.put(request.entity.collection(), &id, Value::Object(body))?;

        tracing::info!(entity = %request.entity, id = %id, "Document created");

        Ok(ExecutionResult {
            success: true,
            message: format!("Created {} {}", request.entity, id),
            data: Some(serde_json::json!({ "id": id })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Entity;
    use norma_store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_writes_document_with_timestamps() {
        let store = MemoryStore::new();
        let request = ActionRequest::new(ActionType::Create, Entity::Audit)
            .with_data(json!({"title": "Q3 internal audit", "scope": "production"}));

        let result = CreateHandler.execute(&store, &request).await.unwrap();
        assert!(result.success);

        let id = result.data.unwrap()["id"].as_str().unwrap().to_string();
        assert!(result.message.contains(&id));

        let doc = store.get("audits", &id).unwrap().unwrap();
        assert_eq!(doc.body["title"], "Q3 internal audit");
        assert!(doc.body["createdAt"].is_i64());
        assert!(doc.body["updatedAt"].is_i64());
    }

    #[tokio::test]
    async fn test_create_does_not_need_entity_id() {
        let store = MemoryStore::new();
        let request = ActionRequest::new(ActionType::Create, Entity::Training);
        assert!(CreateHandler.execute(&store, &request).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_rejects_non_object_data() {
        let store = MemoryStore::new();
        let request =
            ActionRequest::new(ActionType::Create, Entity::Audit).with_data(json!("scalar"));
        let err = CreateHandler.execute(&store, &request).await.unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
    }
}
