//! Ledger refresh and snapshot logic
//!
//! The ledger is the one piece of state shared between the monitoring loop
//! (writer) and the request pipeline (reader). Writers update entries in
//! one refresh pass; readers take an owned `Portfolio` snapshot instead of
//! iterating live state.

use log::{debug, info, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{HashMap, HashSet};
use warden_core::{Portfolio, Position, TokenBalance};

/// Ledger configuration
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Assets treated as cash-equivalent, by id or symbol
    pub cash_assets: HashSet<String>,
    /// Default stop-loss distance below entry, percent; None disables
    pub default_stop_loss_pct: Option<Decimal>,
    /// Default take-profit distance above entry, percent; None disables
    pub default_take_profit_pct: Option<Decimal>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            cash_assets: ["USDC", "USDT"].iter().map(|s| s.to_string()).collect(),
            default_stop_loss_pct: Some(dec!(10)),
            default_take_profit_pct: Some(dec!(50)),
        }
    }
}

/// What one refresh pass changed
#[derive(Debug, Clone, Default)]
pub struct RefreshSummary {
    /// Asset ids newly opened
    pub opened: Vec<String>,
    /// Count of re-marked positions
    pub updated: usize,
    /// Asset ids removed because their balance reached zero
    pub closed: Vec<String>,
}

/// Per-wallet position ledger
#[derive(Debug, Clone)]
pub struct PositionLedger {
    wallet_id: String,
    config: LedgerConfig,
    positions: HashMap<String, Position>,
}

impl PositionLedger {
    pub fn new(wallet_id: impl Into<String>, config: LedgerConfig) -> Self {
        Self {
            wallet_id: wallet_id.into(),
            config,
            positions: HashMap::new(),
        }
    }

    pub fn wallet_id(&self) -> &str {
        &self.wallet_id
    }

    /// Apply one batch of observed balances.
    ///
    /// Unpriced balances are skipped: an existing position keeps its last
    /// mark, an unknown one cannot be opened without an entry price.
    pub fn refresh(&mut self, balances: &[TokenBalance]) -> RefreshSummary {
        let mut summary = RefreshSummary::default();
        let mut seen: HashSet<&str> = HashSet::new();

        for balance in balances {
            if balance.ui_amount <= Decimal::ZERO {
                continue;
            }
            seen.insert(balance.asset_id.as_str());

            let Some(price) = balance.unit_price() else {
                debug!(
                    "[LEDGER] No price for {} in {}, skipping",
                    balance.asset_id, self.wallet_id
                );
                continue;
            };

            match self.positions.get_mut(&balance.asset_id) {
                Some(position) => {
                    position.revalue(balance.ui_amount, price);
                    summary.updated += 1;
                }
                None => match self.open_position(balance, price) {
                    Some(position) => {
                        info!(
                            "[LEDGER] Opened {} in {} at {}",
                            position.symbol, self.wallet_id, price
                        );
                        summary.opened.push(balance.asset_id.clone());
                        self.positions.insert(balance.asset_id.clone(), position);
                    }
                    None => warn!(
                        "[LEDGER] Could not open position for {} in {}",
                        balance.asset_id, self.wallet_id
                    ),
                },
            }
        }

        // Anything we tracked that no longer shows a balance is closed
        let closed: Vec<String> = self
            .positions
            .keys()
            .filter(|asset| !seen.contains(asset.as_str()))
            .cloned()
            .collect();
        for asset in closed {
            info!("[LEDGER] Closed {} in {}", asset, self.wallet_id);
            self.positions.remove(&asset);
            summary.closed.push(asset);
        }

        summary
    }

    fn open_position(&self, balance: &TokenBalance, price: Decimal) -> Option<Position> {
        let symbol = balance
            .symbol
            .clone()
            .unwrap_or_else(|| balance.asset_id.clone());

        let position = Position::open(&balance.asset_id, symbol, balance.ui_amount, price).ok()?;

        // Cash-equivalents carry no protection thresholds; a zero entry
        // price cannot anchor any
        if self.is_cash(balance) || price.is_zero() {
            return Some(position);
        }

        let stop_loss = self
            .config
            .default_stop_loss_pct
            .map(|pct| price * (dec!(1) - pct / dec!(100)));
        let take_profit = self
            .config
            .default_take_profit_pct
            .map(|pct| price * (dec!(1) + pct / dec!(100)));

        position.with_protection(stop_loss, take_profit).ok()
    }

    fn is_cash(&self, balance: &TokenBalance) -> bool {
        self.config.cash_assets.contains(&balance.asset_id)
            || balance
                .symbol
                .as_ref()
                .is_some_and(|s| self.config.cash_assets.contains(s))
    }

    /// Owned point-in-time portfolio view
    pub fn snapshot(&self) -> Portfolio {
        let positions: Vec<Position> = self.positions.values().cloned().collect();
        let total_value: Decimal = positions.iter().map(|p| p.value).sum();
        let cash_balance: Decimal = positions
            .iter()
            .filter(|p| {
                self.config.cash_assets.contains(&p.asset_id)
                    || self.config.cash_assets.contains(&p.symbol)
            })
            .map(|p| p.value)
            .sum();

        Portfolio {
            wallet_id: self.wallet_id.clone(),
            total_value,
            positions,
            cash_balance,
        }
    }

    pub fn position(&self, asset_id: &str) -> Option<&Position> {
        self.positions.get(asset_id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(asset: &str, amount: Decimal, price: Decimal) -> TokenBalance {
        TokenBalance {
            asset_id: asset.to_string(),
            ui_amount: amount,
            price_usd: Some(price),
            value_usd: None,
            symbol: Some(asset.to_string()),
        }
    }

    #[test]
    fn test_refresh_opens_positions() {
        let mut ledger = PositionLedger::new("wallet-1", LedgerConfig::default());

        let summary = ledger.refresh(&[
            balance("BONK", dec!(1000), dec!(0.5)),
            balance("USDC", dec!(200), dec!(1)),
        ]);

        assert_eq!(summary.opened.len(), 2);
        assert_eq!(ledger.len(), 2);

        let bonk = ledger.position("BONK").unwrap();
        assert_eq!(bonk.entry_price, dec!(0.5));
        // Defaults: stop 10% below entry, take 50% above
        assert_eq!(bonk.stop_loss, Some(dec!(0.45)));
        assert_eq!(bonk.take_profit, Some(dec!(0.75)));
    }

    #[test]
    fn test_cash_positions_have_no_protection() {
        let mut ledger = PositionLedger::new("wallet-1", LedgerConfig::default());
        ledger.refresh(&[balance("USDC", dec!(200), dec!(1))]);

        let usdc = ledger.position("USDC").unwrap();
        assert!(usdc.stop_loss.is_none());
        assert!(usdc.take_profit.is_none());
    }

    #[test]
    fn test_refresh_updates_and_closes() {
        let mut ledger = PositionLedger::new("wallet-1", LedgerConfig::default());
        ledger.refresh(&[
            balance("BONK", dec!(1000), dec!(0.5)),
            balance("WIF", dec!(10), dec!(2)),
        ]);

        // WIF balance gone, BONK price moved
        let summary = ledger.refresh(&[balance("BONK", dec!(1000), dec!(0.4))]);

        assert_eq!(summary.updated, 1);
        assert_eq!(summary.closed, vec!["WIF".to_string()]);
        assert_eq!(ledger.len(), 1);

        let bonk = ledger.position("BONK").unwrap();
        assert_eq!(bonk.current_price, dec!(0.4));
        assert_eq!(bonk.pnl, dec!(-100)); // (0.4 - 0.5) * 1000
        assert_eq!(bonk.pnl_percentage, dec!(-20));
    }

    #[test]
    fn test_zero_balance_never_opens() {
        let mut ledger = PositionLedger::new("wallet-1", LedgerConfig::default());
        let summary = ledger.refresh(&[balance("BONK", Decimal::ZERO, dec!(0.5))]);

        assert!(summary.opened.is_empty());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_unpriced_balance_keeps_last_mark() {
        let mut ledger = PositionLedger::new("wallet-1", LedgerConfig::default());
        ledger.refresh(&[balance("BONK", dec!(1000), dec!(0.5))]);

        let mut unpriced = balance("BONK", dec!(1000), dec!(0.5));
        unpriced.price_usd = None;
        let summary = ledger.refresh(&[unpriced]);

        // Not closed, not re-marked
        assert_eq!(summary.updated, 0);
        assert!(summary.closed.is_empty());
        assert_eq!(ledger.position("BONK").unwrap().current_price, dec!(0.5));
    }

    #[test]
    fn test_snapshot_totals_and_cash() {
        let mut ledger = PositionLedger::new("wallet-1", LedgerConfig::default());
        ledger.refresh(&[
            balance("BONK", dec!(1000), dec!(0.9)),
            balance("USDC", dec!(100), dec!(1)),
        ]);

        let portfolio = ledger.snapshot();

        assert_eq!(portfolio.total_value, dec!(1000));
        assert_eq!(portfolio.cash_balance, dec!(100));
        assert_eq!(portfolio.positions.len(), 2);
    }
}
