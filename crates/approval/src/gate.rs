//! Human approval gate
//!
//! Decides from an action's estimated value whether human sign-off is
//! required, and owns the pending-action registry lifecycle: one insert on
//! creation, exactly one resolution (approve, reject, or TTL expiry).

use crate::error::{GateError, GateResult};
use chrono::Utc;
use log::{info, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use warden_core::{ActionStatus, PendingAction, UpdateEvent};
use warden_ports::ActionRegistry;

/// Approval gate configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// USD value at which an action needs a human decision
    pub human_approval_threshold: Decimal,
    /// Lifetime of an unresolved pending action, seconds
    pub action_ttl_secs: i64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            human_approval_threshold: dec!(100),
            action_ttl_secs: warden_core::action::DEFAULT_TTL_SECS,
        }
    }
}

/// How a human (or the TTL) settled a pending action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// Outcome of a resolution attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The action was pending and is now settled
    Resolved(ActionStatus),
    /// Unknown or already-resolved id; a no-op, not an error
    NotFound,
    /// The entry outlived its TTL; it is discarded, never executed
    Expired,
}

/// Gate in front of the execution path
pub struct ApprovalGate {
    config: GateConfig,
    registry: Arc<dyn ActionRegistry>,
}

impl ApprovalGate {
    pub fn new(config: GateConfig, registry: Arc<dyn ActionRegistry>) -> Self {
        Self { config, registry }
    }

    pub fn approval_threshold(&self) -> Decimal {
        self.config.human_approval_threshold
    }

    pub fn registry(&self) -> Arc<dyn ActionRegistry> {
        self.registry.clone()
    }

    /// Returns true when the action now awaits human sign-off.
    ///
    /// Below-threshold actions are auto-approved and leave no trace in the
    /// registry. At or above threshold the action is registered with a
    /// bounded TTL and an `APPROVAL_NEEDED` notification goes out.
    pub async fn evaluate(&self, action: PendingAction) -> GateResult<bool> {
        if action.estimated_value < self.config.human_approval_threshold {
            info!(
                "[GATE] Auto-approved {} ({}) at {}",
                action.id, action.kind, action.estimated_value
            );
            return Ok(false);
        }

        let action = action.with_ttl(self.config.action_ttl_secs);
        let id = action.id.clone();

        if !self.registry.insert_if_absent(&action).await? {
            return Err(GateError::DuplicateAction(id));
        }
        self.registry
            .publish(&UpdateEvent::approval_needed(&id))
            .await?;

        info!(
            "[GATE] Approval required for {} ({}) at {}",
            id, action.kind, action.estimated_value
        );
        Ok(true)
    }

    /// Settle a pending action exactly once.
    ///
    /// Idempotent: unknown or already-resolved ids report `NotFound`
    /// without failing the caller. Entries past their TTL resolve as
    /// `Expired` and publish nothing.
    pub async fn resolve(
        &self,
        id: &str,
        decision: Decision,
        payload: Option<serde_json::Value>,
    ) -> GateResult<Resolution> {
        let Some(action) = self.registry.compare_and_delete(id).await? else {
            info!("[GATE] Resolution for unknown or settled action {id}");
            return Ok(Resolution::NotFound);
        };

        if action.is_expired(Utc::now()) {
            warn!("[GATE] Action {id} expired before resolution, discarding");
            return Ok(Resolution::Expired);
        }

        let (status, event) = match decision {
            Decision::Approve => (ActionStatus::Approved, UpdateEvent::approved(id, payload)),
            Decision::Reject => (ActionStatus::Rejected, UpdateEvent::rejected(id)),
        };
        self.registry.publish(&event).await?;

        info!("[GATE] Action {id} resolved as {status:?}");
        Ok(Resolution::Resolved(status))
    }

    /// Approve with an optional payload (e.g. a client-signed tx hash)
    pub async fn approve(
        &self,
        id: &str,
        payload: Option<serde_json::Value>,
    ) -> GateResult<Resolution> {
        self.resolve(id, Decision::Approve, payload).await
    }

    pub async fn reject(&self, id: &str) -> GateResult<Resolution> {
        self.resolve(id, Decision::Reject, None).await
    }
}
