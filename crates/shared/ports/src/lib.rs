//! Warden Ports
//!
//! Port definitions (traits) for the Warden orchestration engine.
//! These define the boundaries between domain logic and the external
//! collaborators: balance/price providers, swap builders, report
//! generators, and the pending-action registry.

mod activity;
mod analysis;
mod balance;
mod error;
mod registry;
mod report;
mod swap;

pub use activity::{ActivityEvent, ActivityWatcher, WatchSubscription};
pub use analysis::{AnalysisProvider, WalletAssessor};
pub use balance::BalanceProvider;
pub use error::{PortError, PortResult};
pub use registry::ActionRegistry;
pub use report::ReportGenerator;
pub use swap::SwapProvider;
