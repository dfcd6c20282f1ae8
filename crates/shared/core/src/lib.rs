//! Warden Core Domain
//!
//! Pure domain types for the Warden orchestration engine.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod action;
pub mod consensus;
pub mod error;
pub mod execution;
pub mod intel;
pub mod portfolio;
pub mod position;
pub mod report;
pub mod request;
pub mod risk;

// Re-export commonly used types at crate root
pub use action::{
    ActionStatus, PENDING_INDEX_KEY, PendingAction, UPDATES_CHANNEL, UpdateEvent, pending_key,
};
pub use consensus::{ActionProposal, AgentVote, ConsensusResult, ProposalKind};
pub use error::CoreError;
pub use execution::{
    BuiltTransaction, ExecutionPlan, ExecutionResult, Quote, QuoteRequest, RouteStep,
};
pub use intel::{
    Opportunity, OpportunityKind, PortfolioAnalysis, Recommendation, RiskLevel, Signal,
    SignalDirection, TokenAnalysis, TokenHolding,
};
pub use portfolio::{Portfolio, TokenBalance};
pub use position::{Position, StopLossCheck, SuggestedAction, Urgency};
pub use report::{Report, ReportInput, ReportSection, TradeSummary};
pub use request::{EngineRequest, SwapMode};
pub use risk::{RebalanceAction, RebalanceKind, RiskAssessment, RiskFactor};
