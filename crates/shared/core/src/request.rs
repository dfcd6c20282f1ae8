//! Inbound requests, validated into a closed union at the boundary

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Swap direction: fix the input amount, or the output amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapMode {
    #[default]
    ExactIn,
    ExactOut,
}

/// Everything the orchestration pipeline accepts
///
/// On-chain amounts are base units carried as `u128`; they are never
/// floats or numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineRequest {
    /// Research a single token
    AnalyzeToken { asset_id: String },
    /// Swap one asset for another
    Trade {
        input_asset: String,
        output_asset: String,
        amount: u128,
        #[serde(default)]
        mode: SwapMode,
        /// USD value supplied by the caller, used for approval gating.
        /// Unpriced trades always require approval.
        #[serde(default)]
        estimated_value: Option<Decimal>,
    },
    /// Suggest allocation changes for the wallet
    Rebalance,
    /// Summarize portfolio state
    Report,
    /// Scan for new opportunities
    Scan,
}

impl EngineRequest {
    /// Does this request ultimately build a transaction?
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Trade { .. })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::AnalyzeToken { .. } => "analyze_token",
            Self::Trade { .. } => "trade",
            Self::Rebalance => "rebalance",
            Self::Report => "report",
            Self::Scan => "scan",
        }
    }
}
