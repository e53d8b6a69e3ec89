//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the backend URL is an absolute plain-http URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BenderConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::BenderConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend.base_url '{0}' is not an absolute http URL")]
    InvalidBackendUrl(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.connect_secs ({connect}) exceeds timeouts.request_secs ({request})")]
    ConnectExceedsRequest { connect: u64, request: u64 },

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("backend.max_response_bytes must be greater than zero")]
    ZeroResponseLimit,

    #[error("gateway.path_segment '{0}' must be a non-empty plain path segment")]
    InvalidPathSegment(String),

    #[error("gateway.path_segment '{0}' collides with a built-in route")]
    ReservedPathSegment(String),
}

/// Characters with routing meaning in a path segment.
const SEGMENT_FORBIDDEN: [char; 6] = ['/', '{', '}', '*', '?', '#'];

/// Top-level segments already routed by the server.
const RESERVED_SEGMENTS: [&str; 3] = ["api", "articles", "healthz"];

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &BenderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.backend.base_url) {
        Ok(url) if url.scheme() == "http" && url.has_host() => {}
        _ => errors.push(ValidationError::InvalidBackendUrl(
            config.backend.base_url.clone(),
        )),
    }

    if config.backend.max_response_bytes == 0 {
        errors.push(ValidationError::ZeroResponseLimit);
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("connect_secs", timeouts.connect_secs),
        ("request_secs", timeouts.request_secs),
        ("list_secs", timeouts.list_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }
    if timeouts.connect_secs > timeouts.request_secs {
        errors.push(ValidationError::ConnectExceedsRequest {
            connect: timeouts.connect_secs,
            request: timeouts.request_secs,
        });
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    let segment = &config.gateway.path_segment;
    if segment.is_empty() || segment.contains(SEGMENT_FORBIDDEN) {
        errors.push(ValidationError::InvalidPathSegment(segment.clone()));
    } else if RESERVED_SEGMENTS.contains(&segment.as_str()) {
        errors.push(ValidationError::ReservedPathSegment(segment.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
