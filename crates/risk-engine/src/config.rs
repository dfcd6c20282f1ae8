use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Risk engine thresholds
#[derive(Debug, Clone)]
pub struct RiskConfig {
    /// Largest share one position may hold, percent of portfolio value
    pub max_position_pct: Decimal,
    /// Cash share below which liquidity is flagged, percent
    pub min_cash_pct: Decimal,
    /// Non-cash share above which volatility exposure is flagged, percent
    pub max_volatile_pct: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_position_pct: dec!(25),
            min_cash_pct: dec!(5),
            max_volatile_pct: dec!(90),
        }
    }
}
