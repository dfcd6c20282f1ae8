//! Core domain errors

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error(
        "Invalid protection thresholds: stop-loss {stop_loss} must be below entry {entry_price}, take-profit {take_profit} above it"
    )]
    InvalidThresholds {
        stop_loss: Decimal,
        entry_price: Decimal,
        take_profit: Decimal,
    },

    #[error("Position amount must be non-negative, got {0}")]
    NegativeAmount(Decimal),
}
