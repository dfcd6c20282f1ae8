//! Analysis payloads produced by external research collaborators

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Directional read of a single signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    Bullish,
    Bearish,
    Neutral,
}

/// One piece of evidence feeding a recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub direction: SignalDirection,
    pub source: String,
    pub message: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongBuy => "strong_buy",
            Self::Buy => "buy",
            Self::Hold => "hold",
            Self::Sell => "sell",
            Self::StrongSell => "strong_sell",
        }
    }
}

/// Research result for one token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenAnalysis {
    pub asset_id: String,
    pub symbol: String,
    pub price: Decimal,
    pub price_change_24h: Decimal,
    pub volume_24h: Decimal,
    pub market_cap: Decimal,
    pub liquidity: Decimal,
    /// 0-10, higher is riskier
    pub risk_score: Decimal,
    pub signals: Vec<Signal>,
    pub recommendation: Recommendation,
    pub confidence: f64,
}

/// One holding inside a portfolio analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenHolding {
    pub asset_id: String,
    pub symbol: String,
    pub amount: Decimal,
    pub value: Decimal,
    pub percentage: Decimal,
    pub pnl: Decimal,
    pub pnl_percentage: Decimal,
}

/// Health metrics over a whole wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub total_value: Decimal,
    pub holdings: Vec<TokenHolding>,
    pub diversification_score: Decimal,
    pub risk_score: Decimal,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    TokenDiscovery,
    Arbitrage,
    Trend,
    WhaleMovement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// A detected market opportunity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub kind: OpportunityKind,
    pub asset_id: String,
    pub description: String,
    pub expected_return: Decimal,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub expires_at: Option<DateTime<Utc>>,
}
