//! Warden Approval
//!
//! Approval/consensus gating for proposed actions:
//! - `ConsensusCoordinator` aggregates weighted votes into a decision
//! - `ApprovalGate` parks high-value actions behind human sign-off and
//!   owns the pending-action registry contract
//! - `InMemoryRegistry` is the in-process registry adapter

mod consensus;
mod error;
mod gate;
mod memory;

pub use consensus::{ConsensusConfig, ConsensusCoordinator};
pub use error::{GateError, GateResult};
pub use gate::{ApprovalGate, Decision, GateConfig, Resolution};
pub use memory::InMemoryRegistry;
