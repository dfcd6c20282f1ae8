//! Configuration validation and engine wiring

use crate::assessor::LedgerAssessor;
use log::info;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, broadcast};
use warden_approval::{
    ApprovalGate, ConsensusConfig, ConsensusCoordinator, GateConfig, GateResult, InMemoryRegistry,
    Resolution,
};
use warden_core::{
    ActionProposal, AgentVote, ConsensusResult, EngineRequest, PendingAction, UpdateEvent,
};
use warden_ledger::{LedgerConfig, PositionLedger};
use warden_monitor::{Alert, MonitorConfig, MonitoringLoop};
use warden_pipeline::{OrchestrationPipeline, OrchestrationState, PipelineConfig};
use warden_ports::{
    ActionRegistry, ActivityWatcher, AnalysisProvider, BalanceProvider, PortError,
    ReportGenerator, SwapProvider,
};
use warden_risk::{RiskConfig, RiskEngine};

/// Configuration rejected before anything starts
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("wallet id must not be empty")]
    EmptyWalletId,

    #[error("consensus threshold {0} outside [0.5, 1.0]")]
    ConsensusThresholdOutOfRange(f64),

    #[error("human approval threshold {0} must be positive")]
    NonPositiveApprovalThreshold(Decimal),

    #[error("pending action TTL {0}s must be positive")]
    NonPositiveActionTtl(i64),

    #[error("monitor check interval must be positive")]
    ZeroCheckInterval,
}

/// Full engine configuration for one monitored wallet
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub wallet_id: String,
    pub ledger: LedgerConfig,
    pub risk: RiskConfig,
    pub gate: GateConfig,
    pub consensus: ConsensusConfig,
    pub pipeline: PipelineConfig,
    pub monitor: MonitorConfig,
}

impl RunnerConfig {
    pub fn for_wallet(wallet_id: impl Into<String>) -> Self {
        Self {
            wallet_id: wallet_id.into(),
            ledger: LedgerConfig::default(),
            risk: RiskConfig::default(),
            gate: GateConfig::default(),
            consensus: ConsensusConfig::default(),
            pipeline: PipelineConfig::default(),
            monitor: MonitorConfig::default(),
        }
    }

    /// Fail-fast validation; a bad value refuses to start the engine
    pub fn validate(&self) -> Result<(), BootstrapError> {
        if self.wallet_id.trim().is_empty() {
            return Err(BootstrapError::EmptyWalletId);
        }
        if !(0.5..=1.0).contains(&self.consensus.threshold) {
            return Err(BootstrapError::ConsensusThresholdOutOfRange(
                self.consensus.threshold,
            ));
        }
        if self.gate.human_approval_threshold <= Decimal::ZERO {
            return Err(BootstrapError::NonPositiveApprovalThreshold(
                self.gate.human_approval_threshold,
            ));
        }
        if self.gate.action_ttl_secs <= 0 {
            return Err(BootstrapError::NonPositiveActionTtl(
                self.gate.action_ttl_secs,
            ));
        }
        if self.monitor.check_interval.is_zero() {
            return Err(BootstrapError::ZeroCheckInterval);
        }
        Ok(())
    }
}

/// A fully wired engine for one wallet
pub struct EngineBootstrap {
    wallet_id: String,
    registry: Arc<InMemoryRegistry>,
    gate: Arc<ApprovalGate>,
    coordinator: ConsensusCoordinator,
    pipeline: OrchestrationPipeline,
    monitor: MonitoringLoop,
}

impl EngineBootstrap {
    /// Validate the configuration and wire every component. The ledger is
    /// shared between the monitoring loop and the pipeline's assessor.
    pub fn build(
        config: RunnerConfig,
        balances: Arc<dyn BalanceProvider>,
        analysis: Arc<dyn AnalysisProvider>,
        swap: Arc<dyn SwapProvider>,
        reporter: Arc<dyn ReportGenerator>,
        watcher: Option<Arc<dyn ActivityWatcher>>,
    ) -> Result<Self, BootstrapError> {
        config.validate()?;

        let ledger = Arc::new(Mutex::new(PositionLedger::new(
            &config.wallet_id,
            config.ledger.clone(),
        )));
        let engine = RiskEngine::new(config.risk.clone());

        let registry = Arc::new(InMemoryRegistry::new());
        let gate = Arc::new(ApprovalGate::new(config.gate.clone(), registry.clone()));

        let assessor = Arc::new(LedgerAssessor::new(
            ledger.clone(),
            balances.clone(),
            engine.clone(),
        ));
        let pipeline = OrchestrationPipeline::new(
            analysis,
            assessor,
            swap,
            reporter,
            gate.clone(),
            config.pipeline.clone(),
        );
        let monitor = MonitoringLoop::new(
            config.monitor.clone(),
            ledger,
            balances,
            engine,
            watcher,
        );

        info!("[RUNNER] Engine wired for {}", config.wallet_id);
        Ok(Self {
            wallet_id: config.wallet_id,
            registry,
            gate,
            coordinator: ConsensusCoordinator::new(config.consensus),
            pipeline,
            monitor,
        })
    }

    pub fn wallet_id(&self) -> &str {
        &self.wallet_id
    }

    /// Run one request through the pipeline
    pub async fn handle(&self, request: EngineRequest) -> OrchestrationState {
        info!("[RUNNER] Handling {} for {}", request.kind_name(), self.wallet_id);
        self.pipeline.run(request, &self.wallet_id).await
    }

    /// Approve a pending action, optionally attaching a payload
    pub async fn approve(
        &self,
        action_id: &str,
        payload: Option<serde_json::Value>,
    ) -> GateResult<Resolution> {
        self.gate.approve(action_id, payload).await
    }

    /// Reject a pending action
    pub async fn reject(&self, action_id: &str) -> GateResult<Resolution> {
        self.gate.reject(action_id).await
    }

    /// Unexpired actions awaiting a decision
    pub async fn pending_actions(&self) -> Result<Vec<PendingAction>, PortError> {
        self.registry.list().await
    }

    /// Put a proposal to a weighted vote
    pub fn coordinate(&self, proposal: &ActionProposal, votes: &[AgentVote]) -> ConsensusResult {
        self.coordinator.coordinate(proposal, votes)
    }

    pub async fn start_monitor(&self) {
        self.monitor.start().await;
    }

    pub async fn stop_monitor(&self) {
        self.monitor.stop().await;
    }

    pub async fn monitor_running(&self) -> bool {
        self.monitor.is_running().await
    }

    pub fn subscribe_alerts(&self) -> broadcast::Receiver<Alert> {
        self.monitor.subscribe_alerts()
    }

    /// Pending-action lifecycle notifications
    pub fn subscribe_updates(&self) -> broadcast::Receiver<UpdateEvent> {
        self.registry.subscribe()
    }
}
