use crate::error::PortResult;
use async_trait::async_trait;
use warden_core::TokenBalance;

/// Port for the external balance provider
///
/// Returns the raw token balances of a wallet; prices and values are
/// best-effort and may be missing per token.
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    async fn get_balances(&self, wallet_id: &str) -> PortResult<Vec<TokenBalance>>;
}
