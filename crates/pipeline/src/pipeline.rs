//! Stage functions and the transition driver

use crate::state::{Intel, OrchestrationState, Stage, StateUpdate};
use log::{debug, error, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use warden_approval::ApprovalGate;
use warden_core::{
    EngineRequest, ExecutionPlan, ExecutionResult, PendingAction, QuoteRequest, ReportInput,
    TradeSummary,
};
use warden_ports::{AnalysisProvider, ReportGenerator, SwapProvider, WalletAssessor};

/// Pipeline safety thresholds
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Wallet risk score below which every request is halted
    pub min_safe_score: Decimal,
    /// Token risk score (0-10) at or above which a request is halted
    pub max_token_risk: Decimal,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_safe_score: dec!(50),
            max_token_risk: dec!(8),
        }
    }
}

/// Sequences one request through the stages, composing the external
/// collaborators and the approval gate
pub struct OrchestrationPipeline {
    analysis: Arc<dyn AnalysisProvider>,
    assessor: Arc<dyn WalletAssessor>,
    swap: Arc<dyn SwapProvider>,
    reporter: Arc<dyn ReportGenerator>,
    gate: Arc<ApprovalGate>,
    config: PipelineConfig,
}

impl OrchestrationPipeline {
    pub fn new(
        analysis: Arc<dyn AnalysisProvider>,
        assessor: Arc<dyn WalletAssessor>,
        swap: Arc<dyn SwapProvider>,
        reporter: Arc<dyn ReportGenerator>,
        gate: Arc<ApprovalGate>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            analysis,
            assessor,
            swap,
            reporter,
            gate,
            config,
        }
    }

    /// Run a request to completion. Always terminates at `Done` with a
    /// non-empty `final_response`, whatever failed along the way.
    pub async fn run(
        &self,
        request: EngineRequest,
        wallet_id: impl Into<String>,
    ) -> OrchestrationState {
        let mut state = OrchestrationState::new(request, wallet_id);
        let mut stage = Stage::Gathering;

        while stage != Stage::Done {
            debug!("[PIPELINE] {} entering {}", state.wallet_id, stage);
            let (update, next) = match stage {
                Stage::Gathering => self.gather(&state).await,
                Stage::RiskCheck => self.risk_check(&state).await,
                Stage::Gate => self.gate(&state).await,
                Stage::Execute => self.execute(&state).await,
                Stage::Report => self.report(&state).await,
                // Loop condition keeps us out of Done
                Stage::Done => unreachable!(),
            };
            state.apply(update);
            stage = next;
        }

        if state.final_response.is_none() {
            state.final_response = Some("Task completed.".to_string());
        }
        state
    }

    /// GATHERING: pull whatever intelligence the request kind needs.
    /// Collaborator failures degrade to missing intel, never abort.
    async fn gather(&self, state: &OrchestrationState) -> (StateUpdate, Stage) {
        let mut intel = Intel::default();

        match &state.request {
            EngineRequest::AnalyzeToken { asset_id }
            | EngineRequest::Trade {
                output_asset: asset_id,
                ..
            } => match self.analysis.analyze_token(asset_id).await {
                Ok(analysis) => intel.token_analysis = Some(analysis),
                Err(e) => warn!("[PIPELINE] Token analysis unavailable for {asset_id}: {e}"),
            },
            EngineRequest::Rebalance | EngineRequest::Report => {
                match self.analysis.analyze_portfolio(&state.wallet_id).await {
                    Ok(analysis) => intel.portfolio_analysis = Some(analysis),
                    Err(e) => warn!(
                        "[PIPELINE] Portfolio analysis unavailable for {}: {e}",
                        state.wallet_id
                    ),
                }
            }
            EngineRequest::Scan => match self.analysis.scan_opportunities().await {
                Ok(opportunities) => intel.opportunities = Some(opportunities),
                Err(e) => warn!("[PIPELINE] Opportunity scan unavailable: {e}"),
            },
        }

        (
            StateUpdate {
                intel: Some(intel),
                ..Default::default()
            },
            Stage::RiskCheck,
        )
    }

    /// RISK_CHECK: wallet-level assessment plus the per-token risk score
    /// when one was gathered. A missing assessment degrades to no verdict.
    async fn risk_check(&self, state: &OrchestrationState) -> (StateUpdate, Stage) {
        let mut update = StateUpdate::none();
        let mut is_safe = true;

        match self.assessor.assess_wallet(&state.wallet_id).await {
            Ok(assessment) => {
                if assessment.overall_score < self.config.min_safe_score {
                    is_safe = false;
                }
                update.risk_assessment = Some(assessment);
            }
            Err(e) => warn!(
                "[PIPELINE] Wallet assessment unavailable for {}: {e}",
                state.wallet_id
            ),
        }

        if let Some(analysis) = &state.intel.token_analysis
            && analysis.risk_score >= self.config.max_token_risk
        {
            is_safe = false;
        }

        update.is_safe = Some(is_safe);
        (update, Stage::Gate)
    }

    /// GATE: unsafe requests and approval-pending trades short-circuit to
    /// REPORT; everything else that executes moves on to EXECUTE.
    async fn gate(&self, state: &OrchestrationState) -> (StateUpdate, Stage) {
        if !state.is_safe {
            return (
                StateUpdate::with_response(self.risk_alert_text(state)),
                Stage::Report,
            );
        }

        if !state.request.is_execution() {
            return (StateUpdate::none(), Stage::Report);
        }

        let action = self.trade_estimate(state);
        let action_id = action.id.clone();
        let description = action.description.clone();

        match self.gate.evaluate(action).await {
            Ok(true) => (
                StateUpdate::with_response(format!(
                    "Approval required: \"{description}\" exceeds the auto-approval limit. \
                     Pending action {action_id} awaits your decision."
                )),
                Stage::Report,
            ),
            Ok(false) => (StateUpdate::none(), Stage::Execute),
            Err(e) => {
                // If gating cannot be recorded, executing would bypass the
                // human checkpoint; halt instead
                error!("[PIPELINE] Approval gating failed for {action_id}: {e}");
                (
                    StateUpdate::with_response(
                        "Approval gating is unavailable; execution halted.".to_string(),
                    ),
                    Stage::Report,
                )
            }
        }
    }

    /// EXECUTE: quote then build. Failures become an ExecutionResult, not
    /// an abort.
    async fn execute(&self, state: &OrchestrationState) -> (StateUpdate, Stage) {
        let EngineRequest::Trade {
            input_asset,
            output_asset,
            amount,
            mode,
            ..
        } = &state.request
        else {
            return (StateUpdate::none(), Stage::Report);
        };

        let request = QuoteRequest {
            input_asset: input_asset.clone(),
            output_asset: output_asset.clone(),
            amount: *amount,
            mode: *mode,
        };

        let plan = async {
            let quote = self.swap.quote(&request).await?;
            let transaction = self.swap.build(&quote, &state.wallet_id).await?;
            Ok::<_, warden_ports::PortError>(ExecutionPlan { quote, transaction })
        }
        .await;

        let update = match plan {
            Ok(plan) => StateUpdate {
                execution_plan: Some(plan),
                ..Default::default()
            },
            Err(e) => {
                warn!("[PIPELINE] Execution failed for {}: {e}", state.wallet_id);
                StateUpdate {
                    execution_result: Some(ExecutionResult::failed(e.to_string())),
                    ..Default::default()
                }
            }
        };
        (update, Stage::Report)
    }

    /// REPORT: pass an upstream response through unchanged, otherwise
    /// synthesize one from whatever the run produced
    async fn report(&self, state: &OrchestrationState) -> (StateUpdate, Stage) {
        if state.final_response.is_some() {
            return (StateUpdate::none(), Stage::Done);
        }

        let response = if let Some(result) = state
            .execution_result
            .as_ref()
            .filter(|r| !r.success)
        {
            format!(
                "Execution failed: {}",
                result.error.as_deref().unwrap_or("unknown error")
            )
        } else if let Some(plan) = &state.execution_plan {
            self.render_trade(state, plan).await
        } else if let Some(analysis) = &state.intel.token_analysis {
            let signals: String = analysis
                .signals
                .iter()
                .map(|s| format!("\n- {}", s.message))
                .collect();
            format!(
                "Analysis: {} at {}. Recommendation: {} (risk {}/10).{signals}",
                analysis.symbol,
                analysis.price,
                analysis.recommendation.as_str(),
                analysis.risk_score
            )
        } else if let Some(portfolio) = &state.intel.portfolio_analysis {
            self.render_portfolio(portfolio).await
        } else if let Some(opportunities) = &state.intel.opportunities {
            if opportunities.is_empty() {
                "No opportunities found.".to_string()
            } else {
                let lines: String = opportunities
                    .iter()
                    .map(|o| format!("\n- {}: {}", o.asset_id, o.description))
                    .collect();
                format!("Found {} opportunities:{lines}", opportunities.len())
            }
        } else {
            "Task completed.".to_string()
        };

        (StateUpdate::with_response(response), Stage::Done)
    }

    async fn render_trade(&self, state: &OrchestrationState, plan: &ExecutionPlan) -> String {
        let summary = TradeSummary {
            input_asset: plan.quote.input_asset.clone(),
            output_asset: plan.quote.output_asset.clone(),
            amount: plan.quote.input_amount,
            reason: "User request".to_string(),
            confidence: 1.0,
        };

        let explanation = match self.reporter.explain_trade(&summary).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "[PIPELINE] Trade explanation unavailable for {}: {e}",
                    state.wallet_id
                );
                format!(
                    "Swap {} {} for {} (price impact {}%).",
                    plan.quote.input_amount,
                    plan.quote.input_asset,
                    plan.quote.output_asset,
                    plan.quote.price_impact_pct
                )
            }
        };

        format!(
            "{explanation}\n\nTransaction prepared ({}). Sign to execute.",
            plan.transaction.serialized
        )
    }

    async fn render_portfolio(&self, portfolio: &warden_core::PortfolioAnalysis) -> String {
        let input = ReportInput {
            period: "current".to_string(),
            start_value: portfolio.total_value,
            end_value: portfolio.total_value,
            insights: portfolio.suggestions.clone(),
        };

        match self.reporter.portfolio_report(&input).await {
            Ok(report) => format!("## {}\n{}", report.title, report.summary),
            Err(e) => {
                // Malformed generator output falls back to raw text in a
                // single section
                warn!("[PIPELINE] Portfolio report unavailable: {e}");
                let raw = format!(
                    "Portfolio value {} across {} holdings.",
                    portfolio.total_value,
                    portfolio.holdings.len()
                );
                let report = warden_core::Report::from_raw_text(raw);
                format!("## {}\n{}", report.title, report.summary)
            }
        }
    }

    fn risk_alert_text(&self, state: &OrchestrationState) -> String {
        let score = state
            .risk_assessment
            .as_ref()
            .map(|a| a.overall_score.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let mut text = format!(
            "Risk Alert: operation halted. Portfolio risk score {score}/100."
        );
        if let Some(assessment) = &state.risk_assessment
            && !assessment.recommendations.is_empty()
        {
            text.push_str(&format!(
                " Recommendations: {}",
                assessment.recommendations.join(", ")
            ));
        }
        if let Some(analysis) = &state.intel.token_analysis
            && analysis.risk_score >= self.config.max_token_risk
        {
            text.push_str(&format!(
                " Token {} carries extreme risk ({}/10).",
                analysis.symbol, analysis.risk_score
            ));
        }
        text
    }

    /// Pending-action estimate for a trade request. Trades with no caller
    /// valuation are priced at the approval threshold so a human always
    /// sees them.
    fn trade_estimate(&self, state: &OrchestrationState) -> PendingAction {
        let EngineRequest::Trade {
            input_asset,
            output_asset,
            amount,
            estimated_value,
            ..
        } = &state.request
        else {
            return PendingAction::new("trade", self.gate.approval_threshold(), "Unknown trade");
        };

        let value = estimated_value.unwrap_or_else(|| self.gate.approval_threshold());
        PendingAction::new(
            "trade",
            value,
            format!("Swap {amount} {input_asset} for {output_asset}"),
        )
    }
}
