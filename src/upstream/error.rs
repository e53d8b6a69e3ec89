//! Transport-level failures talking to the backend.

use std::time::Duration;
use thiserror::Error;

/// The backend could not be reached or did not answer in time.
///
/// Never reaches the browser as-is: the gateway turns it into a 500 JSON
/// envelope carrying `code()` and the display message.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The composed upstream URL is not a valid URI.
    #[error("invalid upstream URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// DNS resolution or TCP connect failed (includes connect timeout).
    #[error("failed to connect to backend: {0}")]
    Connect(String),

    /// The whole exchange exceeded the total timeout.
    #[error("backend request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The connection broke while sending or awaiting response headers.
    #[error("backend request failed: {0}")]
    Request(String),

    /// The response body could not be read to completion.
    #[error("failed to read backend response body: {0}")]
    Body(String),
}

impl TransportError {
    /// Stable machine-readable code for the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            TransportError::InvalidUrl { .. } => "invalid_url",
            TransportError::Connect(_) => "connect",
            TransportError::Timeout(_) => "timeout",
            TransportError::Request(_) => "request",
            TransportError::Body(_) => "body",
        }
    }
}
