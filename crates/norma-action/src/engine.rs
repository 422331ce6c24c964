//! Direct-action engine orchestration.
//!
//! Composes the permission resolver, summary generator, mutation handlers,
//! and the confirmation/audit adapters into the two-phase
//! request/confirm/execute protocol. This is the only component exposed to
//! external callers.
//!
//! State machine per action id:
//!
//! ```text
//!             create_action_request
//!  (none) ───────────────────────────► PENDING
//!                                         │ confirm_and_execute(confirmed=false)
//!                                         ├────────────────────► CANCELLED (terminal)
//!                                         │ confirm_and_execute(confirmed=true)
//!                                         ▼
//!                                   EXECUTING ──► EXECUTED | FAILED (terminal)
//! ```

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use norma_core::config::EngineConfig;
use norma_core::{NormaError, Timestamp};
use norma_store::DocumentStore;

use crate::error::ActionError;
use crate::executor::ExecutorRegistry;
use crate::permission::{PermissionResolver, UserDirectory};
use crate::store::{AuditTrail, ConfirmationStore};
use crate::summary::generate_summary;
use crate::types::{
    ActionReceipt, ActionRequest, AuditLogEntry, AuditStatus, ConfirmOutcome, Confirmation,
};

/// Status string returned to callers while an action awaits confirmation.
const PENDING_CONFIRMATION: &str = "pending_confirmation";

/// The confirmation-gated mutation engine.
pub struct ActionEngine {
    resolver: PermissionResolver,
    registry: ExecutorRegistry,
    confirmations: ConfirmationStore,
    audit: AuditTrail,
    store: Arc<dyn DocumentStore>,
    audit_log_limit: usize,
}

impl ActionEngine {
    /// Build an engine over the given store and user directory.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        directory: Arc<dyn UserDirectory>,
        config: EngineConfig,
    ) -> Self {
        Self {
            resolver: PermissionResolver::new(directory),
            registry: ExecutorRegistry::default(),
            confirmations: ConfirmationStore::new(
                Arc::clone(&store),
                config.confirmations_collection,
            ),
            audit: AuditTrail::new(Arc::clone(&store), config.audit_collection),
            store,
            audit_log_limit: config.audit_log_limit,
        }
    }

    /// Convenience constructor using default collection names.
    pub fn with_defaults(store: Arc<dyn DocumentStore>, directory: Arc<dyn UserDirectory>) -> Self {
        Self::new(store, directory, EngineConfig::default())
    }

    /// Phase one: validate permission, persist a pending confirmation, and
    /// append the `pending` audit entry. The mutation has not happened yet.
    ///
    /// Permission denials are raised before any persistence; a rejected
    /// request leaves no durable trace.
    pub fn create_action_request(
        &self,
        user_id: &str,
        session_id: &str,
        request: ActionRequest,
    ) -> Result<ActionReceipt, ActionError> {
        if !self.resolver.allows(user_id, request.action_type) {
            warn!(
                user_id = %user_id,
                action_type = %request.action_type,
                "Action request denied"
            );
            return Err(ActionError::PermissionDenied {
                user_id: user_id.to_string(),
                action_type: request.action_type,
            });
        }

        let action_id = Uuid::new_v4();
        let summary = generate_summary(&request);
        let requires_confirmation = request.requires_confirmation;
        let confirmation =
            Confirmation::new(action_id, user_id, session_id, request, summary.clone());

        self.confirmations.create(&confirmation)?;
        self.audit.append(&AuditLogEntry::from_confirmation(
            &confirmation,
            AuditStatus::Pending,
        ))?;

        info!(
            action_id = %action_id,
            user_id = %user_id,
            summary = %summary,
            "Action request created"
        );

        Ok(ActionReceipt {
            action_id,
            status: PENDING_CONFIRMATION.to_string(),
            summary,
            requires_confirmation,
        })
    }

    /// Phase two: resolve a pending confirmation.
    ///
    /// `confirmed = false` cancels without executing and returns a
    /// non-raising outcome; `confirmed = true` runs the mutation handler.
    /// Execution failures are recorded on the confirmation and in the audit
    /// trail before being re-raised. A confirmation that already reached a
    /// terminal state yields `AlreadyResolved`.
    pub async fn confirm_and_execute(
        &self,
        action_id: Uuid,
        user_id: &str,
        confirmed: bool,
    ) -> Result<ConfirmOutcome, ActionError> {
        let (confirmation, version) = self
            .confirmations
            .load(action_id)?
            .ok_or(ActionError::NotFound(action_id))?;

        // Identity check, not a role check: only the original requester
        // may confirm or cancel.
        if confirmation.user_id != user_id {
            warn!(action_id = %action_id, user_id = %user_id, "Confirmation identity mismatch");
            return Err(ActionError::Unauthorized);
        }

        if confirmation.confirmed {
            return Err(ActionError::AlreadyResolved(action_id));
        }

        let handler = self
            .registry
            .get(confirmation.request.action_type)
            .ok_or(ActionError::UnregisteredHandler(
                confirmation.request.action_type,
            ))?;

        // Claim the confirmation before doing anything else. The version
        // guard makes the false -> true transition one-way even under
        // concurrent resolvers.
        let confirmed_at = Timestamp::now();
        self.confirmations.resolve(
            action_id,
            version,
            json!({"confirmed": true, "confirmedAt": confirmed_at.0}),
        )?;

        if !confirmed {
            self.audit.append(&AuditLogEntry::from_confirmation(
                &confirmation,
                AuditStatus::Cancelled,
            ))?;
            info!(action_id = %action_id, "Action cancelled");
            return Ok(ConfirmOutcome {
                success: false,
                message: "cancelled".to_string(),
                data: None,
            });
        }

        match handler.execute(self.store.as_ref(), &confirmation.request).await {
            Ok(result) => {
                let executed_at = Timestamp::now();
                self.confirmations.record_outcome(
                    action_id,
                    json!({
                        "executedAt": executed_at.0,
                        "result": serde_json::to_value(&result).map_err(NormaError::from)?,
                    }),
                )?;
                self.audit.append(
                    &AuditLogEntry::from_confirmation(&confirmation, AuditStatus::Executed)
                        .with_result(result.clone()),
                )?;
                info!(action_id = %action_id, message = %result.message, "Action executed");
                Ok(ConfirmOutcome {
                    success: true,
                    message: result.message,
                    data: result.data,
                })
            }
            Err(err) => {
                let message = err.to_string();
                self.confirmations
                    .record_outcome(action_id, json!({"error": message}))?;
                self.audit.append(
                    &AuditLogEntry::from_confirmation(&confirmation, AuditStatus::Failed)
                        .with_error(&message),
                )?;
                warn!(action_id = %action_id, error = %message, "Action execution failed");
                Err(err)
            }
        }
    }

    /// Unresolved confirmations belonging to `user_id`, newest first.
    pub fn pending_confirmations(&self, user_id: &str) -> Result<Vec<Confirmation>, ActionError> {
        self.confirmations.pending_for(user_id)
    }

    /// The user's audit entries, newest first. `None` uses the configured
    /// default limit.
    pub fn audit_logs(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<AuditLogEntry>, ActionError> {
        self.audit
            .for_user(user_id, limit.unwrap_or(self.audit_log_limit))
    }

    /// All audit entries for one action id, oldest first.
    pub fn audit_logs_for_action(
        &self,
        action_id: Uuid,
    ) -> Result<Vec<AuditLogEntry>, ActionError> {
        self.audit.for_action(action_id)
    }
}
