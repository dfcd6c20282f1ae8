//! Portfolio snapshots and raw balance observations

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::position::Position;

/// One token balance as reported by an external balance provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
    /// Asset identifier (mint address)
    pub asset_id: String,
    /// Human-scale amount (decimals already applied)
    pub ui_amount: Decimal,
    /// USD price, when the provider knows it
    pub price_usd: Option<Decimal>,
    /// USD value, when the provider knows it
    pub value_usd: Option<Decimal>,
    /// Symbol, when the provider knows it
    pub symbol: Option<String>,
}

impl TokenBalance {
    /// Best-effort unit price: explicit price, or value / amount
    pub fn unit_price(&self) -> Option<Decimal> {
        self.price_usd.or_else(|| {
            self.value_usd.and_then(|v| {
                if self.ui_amount.is_zero() {
                    None
                } else {
                    Some(v / self.ui_amount)
                }
            })
        })
    }
}

/// Point-in-time view of everything a wallet holds
///
/// Always derived from position records, never persisted on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub wallet_id: String,
    /// Sum of all position values
    pub total_value: Decimal,
    pub positions: Vec<Position>,
    /// Value held in cash-equivalent assets
    pub cash_balance: Decimal,
}

impl Portfolio {
    /// Empty portfolio for a wallet with no tracked positions
    pub fn empty(wallet_id: impl Into<String>) -> Self {
        Self {
            wallet_id: wallet_id.into(),
            total_value: Decimal::ZERO,
            positions: Vec::new(),
            cash_balance: Decimal::ZERO,
        }
    }

    /// Share of total value held by one position, in percent
    pub fn position_percentage(&self, position: &Position) -> Decimal {
        if self.total_value.is_zero() {
            Decimal::ZERO
        } else {
            position.value / self.total_value * dec!(100)
        }
    }

    /// Share of total value held outside cash-equivalents, in percent
    pub fn volatile_percentage(&self) -> Decimal {
        if self.total_value.is_zero() {
            Decimal::ZERO
        } else {
            (self.total_value - self.cash_balance) / self.total_value * dec!(100)
        }
    }

    /// Share of total value held in cash-equivalents, in percent
    pub fn cash_percentage(&self) -> Decimal {
        if self.total_value.is_zero() {
            Decimal::ZERO
        } else {
            self.cash_balance / self.total_value * dec!(100)
        }
    }
}
