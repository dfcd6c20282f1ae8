//! Per-run orchestration state and its merge rules

use std::fmt;
use warden_core::{
    EngineRequest, ExecutionPlan, ExecutionResult, Opportunity, PortfolioAnalysis,
    RiskAssessment, TokenAnalysis,
};

/// Pipeline stages; `Done` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Gathering,
    RiskCheck,
    Gate,
    Execute,
    Report,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Gathering => "GATHERING",
            Stage::RiskCheck => "RISK_CHECK",
            Stage::Gate => "GATE",
            Stage::Execute => "EXECUTE",
            Stage::Report => "REPORT",
            Stage::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// Intelligence gathered for a request; fields fill in independently
#[derive(Debug, Clone, Default)]
pub struct Intel {
    pub token_analysis: Option<TokenAnalysis>,
    pub portfolio_analysis: Option<PortfolioAnalysis>,
    pub opportunities: Option<Vec<Opportunity>>,
}

impl Intel {
    /// Key-wise merge: populated fields of `other` win, absent ones keep
    /// the existing value
    pub fn merge(&mut self, other: Intel) {
        if other.token_analysis.is_some() {
            self.token_analysis = other.token_analysis;
        }
        if other.portfolio_analysis.is_some() {
            self.portfolio_analysis = other.portfolio_analysis;
        }
        if other.opportunities.is_some() {
            self.opportunities = other.opportunities;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.token_analysis.is_none()
            && self.portfolio_analysis.is_none()
            && self.opportunities.is_none()
    }
}

/// Ephemeral state of one pipeline run; never persisted across requests
#[derive(Debug, Clone)]
pub struct OrchestrationState {
    pub request: EngineRequest,
    pub wallet_id: String,
    pub intel: Intel,
    pub risk_assessment: Option<RiskAssessment>,
    pub is_safe: bool,
    pub execution_plan: Option<ExecutionPlan>,
    pub execution_result: Option<ExecutionResult>,
    pub final_response: Option<String>,
}

impl OrchestrationState {
    pub fn new(request: EngineRequest, wallet_id: impl Into<String>) -> Self {
        Self {
            request,
            wallet_id: wallet_id.into(),
            intel: Intel::default(),
            risk_assessment: None,
            is_safe: true,
            execution_plan: None,
            execution_result: None,
            final_response: None,
        }
    }

    /// Apply a partial update: intel merges key-wise, everything else
    /// overwrites wholesale when set
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(intel) = update.intel {
            self.intel.merge(intel);
        }
        if let Some(assessment) = update.risk_assessment {
            self.risk_assessment = Some(assessment);
        }
        if let Some(is_safe) = update.is_safe {
            self.is_safe = is_safe;
        }
        if let Some(plan) = update.execution_plan {
            self.execution_plan = Some(plan);
        }
        if let Some(result) = update.execution_result {
            self.execution_result = Some(result);
        }
        if let Some(response) = update.final_response {
            self.final_response = Some(response);
        }
    }
}

/// Partial update returned by one stage function
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub intel: Option<Intel>,
    pub risk_assessment: Option<RiskAssessment>,
    pub is_safe: Option<bool>,
    pub execution_plan: Option<ExecutionPlan>,
    pub execution_result: Option<ExecutionResult>,
    pub final_response: Option<String>,
}

impl StateUpdate {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            final_response: Some(response.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use warden_core::Recommendation;

    fn analysis(symbol: &str) -> TokenAnalysis {
        TokenAnalysis {
            asset_id: symbol.to_lowercase(),
            symbol: symbol.to_string(),
            price: dec!(1),
            price_change_24h: dec!(0),
            volume_24h: dec!(0),
            market_cap: dec!(0),
            liquidity: dec!(0),
            risk_score: dec!(2),
            signals: Vec::new(),
            recommendation: Recommendation::Hold,
            confidence: 0.5,
        }
    }

    #[test]
    fn test_intel_merges_key_wise() {
        let mut state = OrchestrationState::new(EngineRequest::Report, "wallet-1");

        state.apply(StateUpdate {
            intel: Some(Intel {
                token_analysis: Some(analysis("TKN")),
                ..Default::default()
            }),
            ..Default::default()
        });
        state.apply(StateUpdate {
            intel: Some(Intel {
                opportunities: Some(Vec::new()),
                ..Default::default()
            }),
            ..Default::default()
        });

        // First key survives the second update
        assert!(state.intel.token_analysis.is_some());
        assert!(state.intel.opportunities.is_some());
    }

    #[test]
    fn test_existing_intel_key_is_overwritten() {
        let mut state = OrchestrationState::new(EngineRequest::Report, "wallet-1");

        state.apply(StateUpdate {
            intel: Some(Intel {
                token_analysis: Some(analysis("OLD")),
                ..Default::default()
            }),
            ..Default::default()
        });
        state.apply(StateUpdate {
            intel: Some(Intel {
                token_analysis: Some(analysis("NEW")),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(state.intel.token_analysis.unwrap().symbol, "NEW");
    }

    #[test]
    fn test_scalars_overwrite() {
        let mut state = OrchestrationState::new(EngineRequest::Report, "wallet-1");
        assert!(state.is_safe);

        state.apply(StateUpdate {
            is_safe: Some(false),
            final_response: Some("halted".to_string()),
            ..Default::default()
        });

        assert!(!state.is_safe);
        assert_eq!(state.final_response.as_deref(), Some("halted"));

        // An empty update changes nothing
        state.apply(StateUpdate::none());
        assert!(!state.is_safe);
    }
}
