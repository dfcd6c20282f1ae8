//! Swap quotes and built transactions

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::request::SwapMode;

/// Request for a swap quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub input_asset: String,
    pub output_asset: String,
    /// Base units of the fixed side
    pub amount: u128,
    pub mode: SwapMode,
}

/// One hop of a swap route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStep {
    pub protocol: String,
    pub pool: String,
    pub input_asset: String,
    pub output_asset: String,
    pub percent: Decimal,
}

/// A priced swap, valid until `expires_at`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    pub input_asset: String,
    pub output_asset: String,
    pub input_amount: u128,
    pub output_amount: u128,
    pub price_impact_pct: Decimal,
    pub route: Vec<RouteStep>,
    pub expires_at: DateTime<Utc>,
}

/// An unsigned transaction ready for client-side signing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltTransaction {
    pub serialized: String,
    /// Base units of the native fee asset
    pub estimated_fee: u64,
    pub expires_at: DateTime<Utc>,
}

/// Quote plus prepared transaction, produced by the execute stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub quote: Quote,
    pub transaction: BuiltTransaction,
}

/// Terminal outcome of an execution attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub signature: Option<String>,
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            signature: None,
            error: Some(error.into()),
        }
    }
}
