//! Alerts raised by the monitoring loop

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use warden_core::{
    Position, RebalanceAction, RiskAssessment, StopLossCheck, SuggestedAction, Urgency,
};

/// What tripped the alert
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertKind {
    /// A position crossed its stop-loss or take-profit threshold
    StopLoss {
        asset_id: String,
        symbol: String,
        reason: String,
        suggested_action: SuggestedAction,
        urgency: Urgency,
    },
    /// The portfolio scored below full health with explicit warnings
    Risk {
        overall_score: Decimal,
        warnings: Vec<String>,
    },
    /// The portfolio drifted out of its allocation limits
    Rebalance { actions: Vec<RebalanceAction> },
}

/// One advisory alert for a monitored wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub wallet_id: String,
    pub kind: AlertKind,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    /// Build from a triggered protection check. Returns None for a clear
    /// check.
    pub fn from_check(
        wallet_id: impl Into<String>,
        position: &Position,
        check: &StopLossCheck,
    ) -> Option<Self> {
        if !check.should_trigger {
            return None;
        }
        Some(Self {
            wallet_id: wallet_id.into(),
            kind: AlertKind::StopLoss {
                asset_id: position.asset_id.clone(),
                symbol: position.symbol.clone(),
                reason: check.reason.clone().unwrap_or_default(),
                suggested_action: check.suggested_action.unwrap_or(SuggestedAction::Hold),
                urgency: check.urgency,
            },
            raised_at: Utc::now(),
        })
    }

    /// Build from a scored assessment. Returns None when it carries no
    /// warnings.
    pub fn from_assessment(
        wallet_id: impl Into<String>,
        assessment: &RiskAssessment,
    ) -> Option<Self> {
        if assessment.warnings.is_empty() {
            return None;
        }
        Some(Self {
            wallet_id: wallet_id.into(),
            kind: AlertKind::Risk {
                overall_score: assessment.overall_score,
                warnings: assessment.warnings.clone(),
            },
            raised_at: Utc::now(),
        })
    }

    pub fn rebalance(wallet_id: impl Into<String>, actions: Vec<RebalanceAction>) -> Self {
        Self {
            wallet_id: wallet_id.into(),
            kind: AlertKind::Rebalance { actions },
            raised_at: Utc::now(),
        }
    }
}
