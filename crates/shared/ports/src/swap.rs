use crate::error::PortResult;
use async_trait::async_trait;
use warden_core::{BuiltTransaction, Quote, QuoteRequest};

/// Port for the swap/quote collaborator
#[async_trait]
pub trait SwapProvider: Send + Sync {
    /// Price a swap
    async fn quote(&self, request: &QuoteRequest) -> PortResult<Quote>;

    /// Build an unsigned transaction for a quoted swap.
    /// Signing happens client-side; the engine never holds keys.
    async fn build(&self, quote: &Quote, wallet_id: &str) -> PortResult<BuiltTransaction>;
}
