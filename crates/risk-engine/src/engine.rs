//! Risk scoring and protective checks
//!
//! Scoring starts at 100 and deducts per breached factor:
//! - Concentration: 2 points per percent over the position cap, weight 0.4
//! - Liquidity: flat 10 points when cash drops under the floor, weight 0.2
//! - Volatility: flat 10 points when non-cash exposure exceeds the cap,
//!   weight 0.3 (this factor deducts score but deliberately emits no
//!   warning or recommendation)

use crate::config::RiskConfig;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use warden_core::{
    Portfolio, Position, RebalanceAction, RebalanceKind, RiskAssessment, RiskFactor,
    StopLossCheck, SuggestedAction, Urgency,
};

/// Pure risk evaluation over ledger snapshots
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    config: RiskConfig,
}

impl RiskEngine {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Evaluate a position against its protection thresholds.
    ///
    /// A breached stop-loss wins over a reached take-profit: capital
    /// preservation first. Positions without a stop-loss never trigger.
    pub fn check_stop_loss(&self, position: &Position) -> StopLossCheck {
        let Some(stop_loss) = position.stop_loss else {
            return StopLossCheck::clear();
        };

        if position.current_price <= stop_loss {
            return StopLossCheck::triggered(
                format!(
                    "{} fell to {} at or below stop-loss {}",
                    position.symbol, position.current_price, stop_loss
                ),
                SuggestedAction::SellAll,
                Urgency::Critical,
            );
        }

        if let Some(take_profit) = position.take_profit
            && position.current_price >= take_profit
        {
            return StopLossCheck::triggered(
                format!(
                    "{} reached {} at or above take-profit {}",
                    position.symbol, position.current_price, take_profit
                ),
                SuggestedAction::SellPartial,
                Urgency::Medium,
            );
        }

        StopLossCheck::clear()
    }

    /// Score the whole portfolio, 100 (healthy) down to 0
    pub fn evaluate_risk(&self, portfolio: &Portfolio) -> RiskAssessment {
        let mut assessment = RiskAssessment::default();

        if portfolio.total_value.is_zero() {
            return assessment;
        }

        let mut score = dec!(100);

        // Concentration
        let max_pct = portfolio
            .positions
            .iter()
            .map(|p| portfolio.position_percentage(p))
            .max()
            .unwrap_or(Decimal::ZERO);

        if max_pct > self.config.max_position_pct {
            let deduction = dec!(2) * (max_pct - self.config.max_position_pct);
            score -= deduction;
            assessment.factors.push(RiskFactor {
                name: "Concentration Risk".to_string(),
                score: (dec!(100) - deduction).max(Decimal::ZERO),
                weight: dec!(0.4),
                description: format!(
                    "Largest position holds {max_pct:.1}% of portfolio value (cap {}%)",
                    self.config.max_position_pct
                ),
            });
            assessment
                .warnings
                .push("High portfolio concentration detected.".to_string());
            assessment.recommendations.push(format!(
                "Reduce the largest position below {}% of portfolio value",
                self.config.max_position_pct
            ));
        } else {
            assessment.factors.push(RiskFactor {
                name: "Concentration Risk".to_string(),
                score: dec!(100),
                weight: dec!(0.4),
                description: "Position sizes within limits".to_string(),
            });
        }

        // Liquidity
        let cash_pct = portfolio.cash_percentage();
        if cash_pct < self.config.min_cash_pct {
            score -= dec!(10);
            assessment.factors.push(RiskFactor {
                name: "Liquidity Risk".to_string(),
                score: dec!(50),
                weight: dec!(0.2),
                description: format!(
                    "Cash reserves at {cash_pct:.1}% (floor {}%)",
                    self.config.min_cash_pct
                ),
            });
            assessment
                .warnings
                .push("Low cash reserves limit the ability to react.".to_string());
        } else {
            assessment.factors.push(RiskFactor {
                name: "Liquidity Risk".to_string(),
                score: dec!(100),
                weight: dec!(0.2),
                description: "Adequate cash reserves".to_string(),
            });
        }

        // Volatility exposure: deducts score but adds no warning or
        // recommendation, unlike the two factors above
        let volatile_pct = portfolio.volatile_percentage();
        if volatile_pct > self.config.max_volatile_pct {
            score -= dec!(10);
            assessment.factors.push(RiskFactor {
                name: "Volatility Risk".to_string(),
                score: dec!(80),
                weight: dec!(0.3),
                description: format!(
                    "{volatile_pct:.1}% of value held in volatile assets"
                ),
            });
        } else {
            assessment.factors.push(RiskFactor {
                name: "Volatility Risk".to_string(),
                score: dec!(100),
                weight: dec!(0.3),
                description: "Volatile exposure within limits".to_string(),
            });
        }

        assessment.overall_score = score.max(Decimal::ZERO).round();
        debug!(
            "[RISK] {} scored {} ({} warnings)",
            portfolio.wallet_id,
            assessment.overall_score,
            assessment.warnings.len()
        );
        assessment
    }

    /// Suggest decreases for every position over the size cap.
    ///
    /// Safety-oriented only: never suggests acquiring more of anything.
    pub fn suggest_rebalance(&self, portfolio: &Portfolio) -> Vec<RebalanceAction> {
        if portfolio.total_value.is_zero() {
            return Vec::new();
        }

        portfolio
            .positions
            .iter()
            .filter_map(|position| {
                let current_pct = portfolio.position_percentage(position);
                if current_pct <= self.config.max_position_pct {
                    return None;
                }
                Some(RebalanceAction {
                    kind: RebalanceKind::Decrease,
                    asset_id: position.asset_id.clone(),
                    current_percentage: current_pct,
                    target_percentage: self.config.max_position_pct,
                    reason: format!(
                        "{} holds {current_pct:.1}% of portfolio value, above the {}% cap",
                        position.symbol, self.config.max_position_pct
                    ),
                    priority: 10,
                })
            })
            .collect()
    }
}
