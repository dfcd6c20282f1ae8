//! Warden Runner
//!
//! Wires the engine together: validates configuration up front, builds the
//! shared ledger, risk engine, approval gate, pipeline and monitoring loop,
//! and exposes the operations a host process needs (handle a request,
//! approve/reject a pending action, start/stop monitoring).
//!
//! The simulated collaborators in `collaborators` stand in for external
//! services so the engine runs end to end without network access.

mod assessor;
mod bootstrap;
pub mod collaborators;

pub use assessor::LedgerAssessor;
pub use bootstrap::{BootstrapError, EngineBootstrap, RunnerConfig};
