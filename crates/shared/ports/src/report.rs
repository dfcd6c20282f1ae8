use crate::error::PortResult;
use async_trait::async_trait;
use warden_core::{Report, ReportInput, TradeSummary};

/// Port for the natural-language report generator
///
/// The core treats this as an opaque text producer. Malformed structured
/// output is handled by callers falling back to raw text wrapped in a
/// single report section.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Explain a prepared trade in natural language
    async fn explain_trade(&self, trade: &TradeSummary) -> PortResult<String>;

    /// Generate a portfolio report from structured data
    async fn portfolio_report(&self, input: &ReportInput) -> PortResult<Report>;
}
