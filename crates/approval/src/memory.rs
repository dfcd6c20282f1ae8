//! In-process pending-action registry
//!
//! DashMap-backed adapter for the `ActionRegistry` port. Entries are keyed
//! the same way the external wire format keys them (`pending:<id>` plus an
//! id index set) so a key-value-store adapter can swap in unchanged.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, DashSet};
use log::debug;
use tokio::sync::broadcast;
use warden_core::{PENDING_INDEX_KEY, PendingAction, UPDATES_CHANNEL, UpdateEvent, pending_key};
use warden_ports::{ActionRegistry, PortResult};

const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// In-memory registry with a broadcast `updates` channel
pub struct InMemoryRegistry {
    entries: DashMap<String, PendingAction>,
    index: DashSet<String>,
    updates: broadcast::Sender<UpdateEvent>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(channel_capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(channel_capacity);
        Self {
            entries: DashMap::new(),
            index: DashSet::new(),
            updates,
        }
    }

    /// Subscribe to the updates channel
    pub fn subscribe(&self) -> broadcast::Receiver<UpdateEvent> {
        self.updates.subscribe()
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionRegistry for InMemoryRegistry {
    async fn insert_if_absent(&self, action: &PendingAction) -> PortResult<bool> {
        match self.entries.entry(pending_key(&action.id)) {
            dashmap::Entry::Occupied(_) => Ok(false),
            dashmap::Entry::Vacant(slot) => {
                slot.insert(action.clone());
                self.index.insert(action.id.clone());
                debug!("[GATE] {PENDING_INDEX_KEY} += {}", action.id);
                Ok(true)
            }
        }
    }

    async fn compare_and_delete(&self, id: &str) -> PortResult<Option<PendingAction>> {
        // DashMap::remove is the compare-and-delete: concurrent resolvers
        // race on it and exactly one gets the entry
        let removed = self.entries.remove(&pending_key(id)).map(|(_, v)| v);
        if removed.is_some() {
            self.index.remove(id);
        }
        Ok(removed)
    }

    async fn list(&self) -> PortResult<Vec<PendingAction>> {
        let now = Utc::now();
        let actions = self
            .index
            .iter()
            .filter_map(|id| self.entries.get(&pending_key(&id)))
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.clone())
            .collect();
        Ok(actions)
    }

    async fn publish(&self, event: &UpdateEvent) -> PortResult<()> {
        debug!("[GATE] {UPDATES_CHANNEL} <- {}", event.action_id());
        // A send with no live subscribers is not a failure
        let _ = self.updates.send(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn action(value: rust_decimal::Decimal) -> PendingAction {
        PendingAction::new("swap", value, "Swap SOL for USDC")
    }

    #[tokio::test]
    async fn test_insert_if_absent_rejects_duplicates() {
        let registry = InMemoryRegistry::new();
        let action = action(dec!(2000));

        assert!(registry.insert_if_absent(&action).await.unwrap());
        assert!(!registry.insert_if_absent(&action).await.unwrap());
        assert_eq!(registry.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_compare_and_delete_settles_races() {
        let registry = Arc::new(InMemoryRegistry::new());
        let action = action(dec!(2000));
        let id = action.id.clone();
        registry.insert_if_absent(&action).await.unwrap();

        // Two concurrent resolvers: exactly one wins the entry
        let a = tokio::spawn({
            let registry = registry.clone();
            let id = id.clone();
            async move { registry.compare_and_delete(&id).await.unwrap() }
        });
        let b = tokio::spawn({
            let registry = registry.clone();
            let id = id.clone();
            async move { registry.compare_and_delete(&id).await.unwrap() }
        });

        let (won_a, won_b) = (a.await.unwrap(), b.await.unwrap());
        assert!(won_a.is_some() ^ won_b.is_some());
        assert!(registry.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_skips_expired() {
        let registry = InMemoryRegistry::new();

        let live = action(dec!(2000));
        let mut stale = action(dec!(3000));
        stale.created_at = Utc::now() - Duration::seconds(7200);

        registry.insert_if_absent(&live).await.unwrap();
        registry.insert_if_absent(&stale).await.unwrap();

        let listed = registry.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, live.id);
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let registry = InMemoryRegistry::new();
        let mut rx = registry.subscribe();

        registry
            .publish(&UpdateEvent::approval_needed("act-1"))
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.action_id(), "act-1");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let registry = InMemoryRegistry::new();
        assert!(
            registry
                .publish(&UpdateEvent::rejected("act-1"))
                .await
                .is_ok()
        );
    }
}
