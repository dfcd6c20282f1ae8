//! Warden Orchestration Pipeline
//!
//! Deterministic state machine sequencing one incoming request through
//! GATHERING -> RISK_CHECK -> GATE -> {EXECUTE | SKIP} -> REPORT -> DONE.
//!
//! Stage functions receive an immutable snapshot of the run state and
//! return partial updates; updates merge with explicit per-field reducers
//! (scalars overwrite, the intel map merges key-wise). External calls may
//! fail per stage without aborting the run: later stages tolerate the
//! missing fields and every run terminates with a non-empty response.

mod pipeline;
mod state;

pub use pipeline::{OrchestrationPipeline, PipelineConfig};
pub use state::{Intel, OrchestrationState, Stage, StateUpdate};
