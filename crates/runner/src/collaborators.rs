//! Simulated external collaborators
//!
//! Deterministic stand-ins for the balance, analysis, swap and report
//! services. They let the wired engine run end to end in demos and
//! integration tests without any network access.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;
use warden_core::{
    BuiltTransaction, Opportunity, OpportunityKind, PortfolioAnalysis, Quote, QuoteRequest,
    Recommendation, Report, ReportInput, ReportSection, RiskLevel, Signal, SignalDirection,
    TokenAnalysis, TokenBalance, TradeSummary,
};
use warden_ports::{
    AnalysisProvider, BalanceProvider, PortError, PortResult, ReportGenerator, SwapProvider,
};

/// Balance provider serving a mutable in-memory balance sheet
pub struct StaticBalanceProvider {
    balances: Mutex<Vec<TokenBalance>>,
}

impl StaticBalanceProvider {
    pub fn new(balances: Vec<TokenBalance>) -> Self {
        Self {
            balances: Mutex::new(balances),
        }
    }

    /// Replace the balance sheet the next cycle will observe
    pub fn set_balances(&self, balances: Vec<TokenBalance>) {
        if let Ok(mut slot) = self.balances.lock() {
            *slot = balances;
        }
    }
}

#[async_trait]
impl BalanceProvider for StaticBalanceProvider {
    async fn get_balances(&self, _wallet_id: &str) -> PortResult<Vec<TokenBalance>> {
        self.balances
            .lock()
            .map(|b| b.clone())
            .map_err(|_| PortError::Unavailable("balance sheet poisoned".to_string()))
    }
}

/// Analysis provider with a fixed verdict per request kind
pub struct ScriptedAnalysisProvider {
    pub token_risk: Decimal,
    pub recommendation: Recommendation,
}

impl Default for ScriptedAnalysisProvider {
    fn default() -> Self {
        Self {
            token_risk: dec!(3),
            recommendation: Recommendation::Hold,
        }
    }
}

#[async_trait]
impl AnalysisProvider for ScriptedAnalysisProvider {
    async fn analyze_token(&self, asset_id: &str) -> PortResult<TokenAnalysis> {
        Ok(TokenAnalysis {
            asset_id: asset_id.to_string(),
            symbol: asset_id.to_uppercase(),
            price: dec!(1.00),
            price_change_24h: dec!(0.5),
            volume_24h: dec!(250000),
            market_cap: dec!(10000000),
            liquidity: dec!(500000),
            risk_score: self.token_risk,
            signals: vec![Signal {
                direction: SignalDirection::Neutral,
                source: "simulated".to_string(),
                message: "No unusual activity observed".to_string(),
                weight: 0.5,
            }],
            recommendation: self.recommendation,
            confidence: 0.75,
        })
    }

    async fn analyze_portfolio(&self, _wallet_id: &str) -> PortResult<PortfolioAnalysis> {
        Ok(PortfolioAnalysis {
            total_value: dec!(10000),
            holdings: Vec::new(),
            diversification_score: dec!(60),
            risk_score: dec!(4),
            suggestions: vec!["Keep cash reserves above the floor".to_string()],
        })
    }

    async fn scan_opportunities(&self) -> PortResult<Vec<Opportunity>> {
        Ok(vec![Opportunity {
            id: Uuid::new_v4().to_string(),
            kind: OpportunityKind::Trend,
            asset_id: "sim-token".to_string(),
            description: "Sustained volume growth on SIM".to_string(),
            expected_return: dec!(8),
            risk_level: RiskLevel::Medium,
            confidence: 0.6,
            expires_at: None,
        }])
    }
}

/// Swap provider quoting a flat 1:1 rate; failures can be toggled on to
/// exercise the degraded path
pub struct FixedSwapProvider {
    failing: AtomicBool,
}

impl FixedSwapProvider {
    pub fn new() -> Self {
        Self {
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Default for FixedSwapProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SwapProvider for FixedSwapProvider {
    async fn quote(&self, request: &QuoteRequest) -> PortResult<Quote> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PortError::Unavailable("no route available".to_string()));
        }
        Ok(Quote {
            id: Uuid::new_v4(),
            input_asset: request.input_asset.clone(),
            output_asset: request.output_asset.clone(),
            input_amount: request.amount,
            output_amount: request.amount,
            price_impact_pct: dec!(0.05),
            route: Vec::new(),
            expires_at: Utc::now() + Duration::seconds(60),
        })
    }

    async fn build(&self, quote: &Quote, _wallet_id: &str) -> PortResult<BuiltTransaction> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PortError::Unavailable("builder offline".to_string()));
        }
        Ok(BuiltTransaction {
            serialized: format!("sim-tx-{}", quote.id),
            estimated_fee: 5000,
            expires_at: quote.expires_at,
        })
    }
}

/// Report generator filling fixed templates
pub struct TemplateReporter;

#[async_trait]
impl ReportGenerator for TemplateReporter {
    async fn explain_trade(&self, trade: &TradeSummary) -> PortResult<String> {
        Ok(format!(
            "This trade swaps {} base units of {} into {}. Reason: {}.",
            trade.amount, trade.input_asset, trade.output_asset, trade.reason
        ))
    }

    async fn portfolio_report(&self, input: &ReportInput) -> PortResult<Report> {
        Ok(Report {
            title: format!("Portfolio Report ({})", input.period),
            summary: format!(
                "Value moved from {} to {} over the period.",
                input.start_value, input.end_value
            ),
            sections: input
                .insights
                .iter()
                .map(|insight| ReportSection {
                    heading: "Insight".to_string(),
                    content: insight.clone(),
                })
                .collect(),
            generated_at: Utc::now(),
        })
    }
}
