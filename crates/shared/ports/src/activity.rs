use crate::error::PortResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Raw chain-activity payload forwarded from an inbound webhook
#[derive(Debug, Clone)]
pub struct ActivityEvent {
    pub wallet_id: String,
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

impl ActivityEvent {
    pub fn new(wallet_id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            wallet_id: wallet_id.into(),
            payload,
            received_at: Utc::now(),
        }
    }
}

/// A registered push subscription and its event stream
pub struct WatchSubscription {
    pub id: String,
    pub events: mpsc::Receiver<ActivityEvent>,
}

/// Port for push-notification subscriptions on wallet activity
///
/// Registration failure is not fatal: the monitoring loop logs it and
/// continues in poll-only mode.
#[async_trait]
pub trait ActivityWatcher: Send + Sync {
    async fn register_watch(&self, wallet_id: &str) -> PortResult<WatchSubscription>;
}
