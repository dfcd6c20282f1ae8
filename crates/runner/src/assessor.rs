//! Wallet assessment over the shared ledger

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;
use tokio::sync::Mutex;
use warden_core::RiskAssessment;
use warden_ledger::PositionLedger;
use warden_ports::{BalanceProvider, PortResult, WalletAssessor};
use warden_risk::RiskEngine;

/// `WalletAssessor` backed by the shared position ledger.
///
/// Uses the same refresh path as the monitoring loop: fetch balances,
/// refresh the ledger, score the snapshot. The pipeline therefore assesses
/// the exact state the monitor maintains.
pub struct LedgerAssessor {
    ledger: Arc<Mutex<PositionLedger>>,
    balances: Arc<dyn BalanceProvider>,
    engine: RiskEngine,
}

impl LedgerAssessor {
    pub fn new(
        ledger: Arc<Mutex<PositionLedger>>,
        balances: Arc<dyn BalanceProvider>,
        engine: RiskEngine,
    ) -> Self {
        Self {
            ledger,
            balances,
            engine,
        }
    }
}

#[async_trait]
impl WalletAssessor for LedgerAssessor {
    async fn assess_wallet(&self, wallet_id: &str) -> PortResult<RiskAssessment> {
        let balances = self.balances.get_balances(wallet_id).await?;

        let portfolio = {
            let mut ledger = self.ledger.lock().await;
            ledger.refresh(&balances);
            ledger.snapshot()
        };
        debug!(
            "[RUNNER] Assessing {wallet_id} over {} positions",
            portfolio.positions.len()
        );

        Ok(self.engine.evaluate_risk(&portfolio))
    }
}
