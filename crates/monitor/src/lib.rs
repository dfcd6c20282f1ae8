//! Warden Monitor
//!
//! Background loop over a wallet: refresh the position ledger on an
//! interval (and on pushed chain activity when a watcher is available),
//! check protection thresholds, and broadcast alerts. The loop never
//! executes anything on its own; alerts are advisory.

mod alert;
mod monitor;

pub use alert::{Alert, AlertKind};
pub use monitor::{MonitorConfig, MonitoringLoop};
