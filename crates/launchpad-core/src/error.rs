//! Error types for service communication.
//!
//! Orchestrators catch every [`TransportError`] at their boundary and turn it
//! into user-visible status; nothing here is fatal.

use thiserror::Error;

/// Failure talking to the local client service or the mod registry.
///
/// All variants are treated the same by the orchestrators; the split exists
/// for logs.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid endpoint URL {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Endpoint the failure relates to, if known.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            TransportError::Request { endpoint, .. }
            | TransportError::Status { endpoint, .. }
            | TransportError::Decode { endpoint, .. } => Some(endpoint),
            TransportError::InvalidUrl(_) | TransportError::Other(_) => None,
        }
    }
}

/// Convenience alias used by transport implementations.
pub type TransportResult<T> = Result<T, TransportError>;
