//! Human-readable action summaries.
//!
//! The same string is shown in the confirmation prompt and written to every
//! audit entry, so the two can never diverge. Pure function, no I/O.

use crate::types::{ActionRequest, ActionType};

/// Placeholder rendered for fields that are absent at summary time.
///
/// Intentional: required fields are validated only at execution, and the
/// confirmation UI inherited this rendering from the original application.
const MISSING: &str = "undefined";

/// Produce the deterministic description of a requested action.
pub fn generate_summary(request: &ActionRequest) -> String {
    let entity = request.entity.to_string();
    let entity_id = request.entity_id.as_deref().unwrap_or(MISSING);

    match request.action_type {
        ActionType::Create => format!("Create new {}", entity),
        ActionType::Update => format!("Update {} {}", entity, entity_id),
        ActionType::Complete => format!("Mark {} {} as completed", entity, entity_id),
        ActionType::Assign => {
            let assignee = request
                .data
                .get("assignedTo")
                .and_then(|v| v.as_str())
                .unwrap_or(MISSING);
            format!("Assign {} {} to {}", entity, entity_id, assignee)
        }
        ActionType::ChangeStatus => {
            let status = request
                .data
                .get("newStatus")
                .and_then(|v| v.as_str())
                .unwrap_or(MISSING);
            format!("Change status of {} {} to {}", entity, entity_id, status)
        }
        ActionType::Delete => format!("Delete {} {}", entity, entity_id),
    }
}
