//! Position Ledger
//!
//! Per-wallet mapping of tracked asset to position record, refreshed from
//! an external balance provider. Positions appear when a nonzero balance is
//! first observed, are re-marked on every refresh, and disappear when the
//! observed balance drops to zero.

mod ledger;

pub use ledger::{LedgerConfig, PositionLedger, RefreshSummary};
