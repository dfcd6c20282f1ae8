use crate::error::PortResult;
use async_trait::async_trait;
use warden_core::{Opportunity, PortfolioAnalysis, RiskAssessment, TokenAnalysis};

/// Port for the research/analysis collaborator
///
/// Absence of data for an asset is an `Unavailable` error, never a panic;
/// analysis for that asset is simply missing downstream.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Research a single token
    async fn analyze_token(&self, asset_id: &str) -> PortResult<TokenAnalysis>;

    /// Health metrics over a wallet's holdings
    async fn analyze_portfolio(&self, wallet_id: &str) -> PortResult<PortfolioAnalysis>;

    /// Scan for new opportunities
    async fn scan_opportunities(&self) -> PortResult<Vec<Opportunity>>;
}

/// Port for wallet-level risk assessment
///
/// The default implementation refreshes the position ledger and runs the
/// risk engine over the snapshot; the pipeline only sees this trait.
#[async_trait]
pub trait WalletAssessor: Send + Sync {
    async fn assess_wallet(&self, wallet_id: &str) -> PortResult<RiskAssessment>;
}
