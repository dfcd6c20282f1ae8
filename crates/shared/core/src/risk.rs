//! Risk assessment and rebalancing types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One scored component of a portfolio risk assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    /// 0-100, lower is riskier
    pub score: Decimal,
    /// Relative weight in [0, 1]
    pub weight: Decimal,
    pub description: String,
}

/// Whole-portfolio risk picture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 0-100, lower is riskier
    pub overall_score: Decimal,
    pub factors: Vec<RiskFactor>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            overall_score: dec!(100),
            factors: Vec::new(),
            warnings: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

/// Direction of a suggested allocation change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebalanceKind {
    Increase,
    Decrease,
    Exit,
}

/// One suggested allocation change for a single asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceAction {
    pub kind: RebalanceKind,
    pub asset_id: String,
    pub current_percentage: Decimal,
    pub target_percentage: Decimal,
    pub reason: String,
    pub priority: u8,
}
