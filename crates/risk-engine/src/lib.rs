//! Warden Risk Engine
//!
//! Pure functions over portfolio snapshots:
//! - Stop-loss/take-profit evaluation per position
//! - Whole-portfolio risk scoring (concentration, liquidity, volatility)
//! - Rebalance suggestions for oversized positions
//!
//! Everything here is synchronous and side-effect free; callers hand in
//! owned snapshots and get values back.

mod config;
mod engine;

pub use config::RiskConfig;
pub use engine::RiskEngine;
