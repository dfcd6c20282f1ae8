//! Approval gate errors

use thiserror::Error;
use warden_ports::PortError;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Pending action {0} already registered")]
    DuplicateAction(String),

    #[error("Registry error: {0}")]
    Registry(#[from] PortError),
}

pub type GateResult<T> = std::result::Result<T, GateError>;
