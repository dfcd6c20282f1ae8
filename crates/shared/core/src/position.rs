//! Tracked positions and stop-loss/take-profit checks
//!
//! Positions are long-only: they are observed from wallet balances, not from
//! fills. The entry price is therefore best-effort - it is the price seen
//! when a nonzero balance first appeared, not a true fill price.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// A tracked asset holding in a monitored wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Unique position identifier
    pub id: Uuid,

    /// Asset identifier (mint address)
    pub asset_id: String,

    /// Human-readable symbol
    pub symbol: String,

    /// Price observed when the position was first seen
    pub entry_price: Decimal,

    /// Latest observed price
    pub current_price: Decimal,

    /// Held amount (always non-negative)
    pub amount: Decimal,

    /// amount * current_price
    pub value: Decimal,

    /// Unrealized P&L against the entry price
    pub pnl: Decimal,

    /// P&L as a percentage of the entry value
    pub pnl_percentage: Decimal,

    /// Price below which the position should be fully exited
    pub stop_loss: Option<Decimal>,

    /// Price above which profit should be partially realized
    pub take_profit: Option<Decimal>,

    /// When the position was first observed
    pub opened_at: DateTime<Utc>,

    /// Last refresh time
    pub updated_at: DateTime<Utc>,
}

impl Position {
    /// Open a position from a first-seen balance observation
    pub fn open(
        asset_id: impl Into<String>,
        symbol: impl Into<String>,
        amount: Decimal,
        price: Decimal,
    ) -> Result<Self, CoreError> {
        if amount < Decimal::ZERO {
            return Err(CoreError::NegativeAmount(amount));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            asset_id: asset_id.into(),
            symbol: symbol.into(),
            entry_price: price,
            current_price: price,
            amount,
            value: amount * price,
            pnl: Decimal::ZERO,
            pnl_percentage: Decimal::ZERO,
            stop_loss: None,
            take_profit: None,
            opened_at: now,
            updated_at: now,
        })
    }

    /// Attach protection thresholds, enforcing stop < entry < take
    pub fn with_protection(
        mut self,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
    ) -> Result<Self, CoreError> {
        let stop_ok = stop_loss.is_none_or(|sl| sl < self.entry_price);
        let take_ok = take_profit.is_none_or(|tp| tp > self.entry_price);

        if !stop_ok || !take_ok {
            return Err(CoreError::InvalidThresholds {
                stop_loss: stop_loss.unwrap_or(Decimal::ZERO),
                entry_price: self.entry_price,
                take_profit: take_profit.unwrap_or(Decimal::ZERO),
            });
        }

        self.stop_loss = stop_loss;
        self.take_profit = take_profit;
        Ok(self)
    }

    /// Re-mark the position against a fresh price and amount
    pub fn revalue(&mut self, amount: Decimal, price: Decimal) {
        self.amount = amount;
        self.current_price = price;
        self.value = amount * price;
        self.pnl = (price - self.entry_price) * amount;
        self.pnl_percentage = if self.entry_price.is_zero() {
            Decimal::ZERO
        } else {
            (price - self.entry_price) / self.entry_price * dec!(100)
        };
        self.updated_at = Utc::now();
    }
}

/// What to do with a position that crossed a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    SellAll,
    SellPartial,
    Hold,
}

/// How fast the owner should act on a triggered check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

/// Outcome of a stop-loss/take-profit evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopLossCheck {
    pub should_trigger: bool,
    pub reason: Option<String>,
    pub suggested_action: Option<SuggestedAction>,
    pub urgency: Urgency,
}

impl StopLossCheck {
    /// A check that found nothing to act on
    pub fn clear() -> Self {
        Self {
            should_trigger: false,
            reason: None,
            suggested_action: None,
            urgency: Urgency::Low,
        }
    }

    /// A triggered check with the given disposition
    pub fn triggered(reason: String, action: SuggestedAction, urgency: Urgency) -> Self {
        Self {
            should_trigger: true,
            reason: Some(reason),
            suggested_action: Some(action),
            urgency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_position() {
        let pos = Position::open("mint-a", "TKN", dec!(10), dec!(2.5)).unwrap();

        assert_eq!(pos.entry_price, dec!(2.5));
        assert_eq!(pos.current_price, dec!(2.5));
        assert_eq!(pos.value, dec!(25));
        assert_eq!(pos.pnl, Decimal::ZERO);
        assert!(pos.stop_loss.is_none());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = Position::open("mint-a", "TKN", dec!(-1), dec!(2.5));
        assert!(matches!(result, Err(CoreError::NegativeAmount(_))));
    }

    #[test]
    fn test_protection_ordering_enforced() {
        let pos = Position::open("mint-a", "TKN", dec!(10), dec!(100)).unwrap();

        // Valid: stop below entry, take above
        let ok = pos
            .clone()
            .with_protection(Some(dec!(90)), Some(dec!(150)));
        assert!(ok.is_ok());

        // Stop-loss above entry is invalid
        let bad = pos.with_protection(Some(dec!(110)), Some(dec!(150)));
        assert!(matches!(bad, Err(CoreError::InvalidThresholds { .. })));
    }

    #[test]
    fn test_revalue_computes_pnl() {
        let mut pos = Position::open("mint-a", "TKN", dec!(10), dec!(100)).unwrap();

        pos.revalue(dec!(10), dec!(80));

        assert_eq!(pos.value, dec!(800));
        assert_eq!(pos.pnl, dec!(-200));
        assert_eq!(pos.pnl_percentage, dec!(-20));
    }

    #[test]
    fn test_revalue_zero_entry() {
        let mut pos = Position::open("mint-a", "TKN", dec!(10), Decimal::ZERO).unwrap();

        pos.revalue(dec!(10), dec!(5));

        // No entry price to measure against
        assert_eq!(pos.pnl_percentage, Decimal::ZERO);
    }
}
