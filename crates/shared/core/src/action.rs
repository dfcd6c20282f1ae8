//! Pending actions awaiting human approval, and the wire format the
//! dashboard reads them through
//!
//! Registry contract: entry key `pending:<id>` holds the JSON action record,
//! the set under `pending_actions` indexes outstanding ids, and resolution
//! notifications go out on the `updates` channel.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default lifetime of an unresolved action, in seconds
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// Index set key listing outstanding action ids
pub const PENDING_INDEX_KEY: &str = "pending_actions";

/// Notification channel carrying resolution events
pub const UPDATES_CHANNEL: &str = "updates";

/// Registry key for one pending action record
pub fn pending_key(id: &str) -> String {
    format!("pending:{id}")
}

/// Lifecycle of a pending action; resolved exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
}

/// A high-value action parked until a human approves or rejects it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub estimated_value: Decimal,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    pub status: ActionStatus,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Store property, not part of the dashboard record
    #[serde(skip_serializing, default = "default_ttl")]
    pub ttl_secs: i64,
}

fn default_ttl() -> i64 {
    DEFAULT_TTL_SECS
}

impl PendingAction {
    pub fn new(
        kind: impl Into<String>,
        estimated_value: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: kind.into(),
            estimated_value,
            description: description.into(),
            payload: None,
            status: ActionStatus::Pending,
            created_at: Utc::now(),
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(self.ttl_secs)
    }

    /// An entry past its TTL must never be executed, even if a late
    /// resolution request arrives
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// Event published on the `updates` channel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum UpdateEvent {
    ApprovalNeeded {
        action_id: String,
        timestamp: i64,
    },
    Approved {
        action_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<serde_json::Value>,
        timestamp: i64,
    },
    Rejected {
        action_id: String,
        timestamp: i64,
    },
}

impl UpdateEvent {
    pub fn approval_needed(action_id: impl Into<String>) -> Self {
        Self::ApprovalNeeded {
            action_id: action_id.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn approved(action_id: impl Into<String>, payload: Option<serde_json::Value>) -> Self {
        Self::Approved {
            action_id: action_id.into(),
            payload,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn rejected(action_id: impl Into<String>) -> Self {
        Self::Rejected {
            action_id: action_id.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn action_id(&self) -> &str {
        match self {
            Self::ApprovalNeeded { action_id, .. }
            | Self::Approved { action_id, .. }
            | Self::Rejected { action_id, .. } => action_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_wire_format() {
        let action = PendingAction::new("swap", dec!(2000), "Swap SOL for USDC");
        let json = serde_json::to_value(&action).unwrap();

        assert_eq!(json["type"], "swap");
        assert_eq!(json["status"], "pending");
        assert!(json["timestamp"].is_i64());
        assert!(json.get("ttlSecs").is_none());
        assert!(json.get("payload").is_none());
    }

    #[test]
    fn test_ttl_expiry() {
        let action = PendingAction::new("swap", dec!(2000), "Swap").with_ttl(10);

        assert!(!action.is_expired(action.created_at + Duration::seconds(5)));
        assert!(action.is_expired(action.created_at + Duration::seconds(10)));
    }

    #[test]
    fn test_update_event_tags() {
        let event = UpdateEvent::approval_needed("act-1");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "APPROVAL_NEEDED");
        assert_eq!(json["actionId"], "act-1");
    }

    #[test]
    fn test_pending_key() {
        assert_eq!(pending_key("abc"), "pending:abc");
    }
}
