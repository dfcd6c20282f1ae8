use crate::error::PortResult;
use async_trait::async_trait;
use warden_core::{PendingAction, UpdateEvent};

/// Port for the pending-action registry
///
/// The core never assumes a specific backing store; any key-value service
/// that can do insert-if-absent and compare-and-delete satisfies this
/// contract. Entries live under `pending:<id>` with an index set of
/// outstanding ids, and notifications go out on the `updates` channel
/// (see `warden_core::action` for the wire format).
#[async_trait]
pub trait ActionRegistry: Send + Sync {
    /// Insert a new pending action; returns false if the id already exists
    async fn insert_if_absent(&self, action: &PendingAction) -> PortResult<bool>;

    /// Atomically remove and return the action, only if still present.
    /// Resolution races are settled here: exactly one caller wins.
    async fn compare_and_delete(&self, id: &str) -> PortResult<Option<PendingAction>>;

    /// Outstanding actions, skipping entries past their TTL
    async fn list(&self) -> PortResult<Vec<PendingAction>>;

    /// Publish a notification on the updates channel
    async fn publish(&self, event: &UpdateEvent) -> PortResult<()>;
}
