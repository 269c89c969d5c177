use crate::config::ValidationError;
use dashapi::{ClientError, CodecError};

/// Result type alias for relay operations
pub type Result<T, E = RelayError> = std::result::Result<T, E>;

/// Why a single proxied call failed.
///
/// Callers only ever see [`DispatchError::WIRE_MESSAGE`]; the variants exist for logging.
#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("unknown method: {0:?}")]
    UnknownMethod(String),

    #[error("malformed payload: {0}")]
    Decode(#[from] CodecError),

    #[error("forward target {target} failed: {source}")]
    Downstream { target: String, source: ClientError },
}

impl DispatchError {
    /// Error string returned to callers for every failure.
    pub const WIRE_MESSAGE: &'static str = "unknown method";

    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::UnknownMethod(_) => "unknown_method",
            DispatchError::Decode(_) => "decode",
            DispatchError::Downstream { .. } => "downstream",
        }
    }
}

/// Errors that stop the relay from starting or serving
#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("could not create dashboard client: {0}")]
    Client(#[from] ClientError),
}
