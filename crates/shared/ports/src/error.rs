use thiserror::Error;

/// Errors surfaced by external collaborators
///
/// `Unavailable` means the provider returned nothing or failed transiently;
/// callers degrade locally and continue. `InvalidResponse` means the
/// provider answered with something malformed; the affected item is treated
/// as unavailable without poisoning the rest of the batch.
#[derive(Error, Debug)]
pub enum PortError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),

    #[error("Request rejected by provider: {0}")]
    Rejected(String),

    #[error("Channel closed")]
    ChannelClosed,
}

pub type PortResult<T> = std::result::Result<T, PortError>;
