//! Endpoint resolution.
//!
//! # Responsibilities
//! - Hold the ordered endpoint matchers
//! - Resolve an inbound URI to a logical backend path
//! - Return an explicit InvalidEndpoint rather than a silent default
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins: query parameter, then gateway segment, then `/api/`
//! - A matched but empty endpoint is invalid; it does not fall through

use axum::http::Uri;
use std::fmt;
use thiserror::Error;

use crate::config::GatewayConfig;
use crate::routing::matcher::{EndpointMatcher, PathSuffixMatcher, QueryParamMatcher};

/// Query parameter carrying an explicit endpoint.
pub const ENDPOINT_PARAM: &str = "endpoint";

/// Legacy path segment accepted for backward-compatible links.
pub const LEGACY_API_SEGMENT: &str = "api";

/// A backend path relative to `/api/`, never empty and never slash-delimited.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalPath(String);

impl LogicalPath {
    /// Trim surrounding slashes; `None` if nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The request does not name a backend endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid API endpoint: {path}")]
pub struct InvalidEndpoint {
    pub path: String,
}

/// Ordered set of endpoint matchers.
#[derive(Debug)]
pub struct EndpointResolver {
    matchers: Vec<Box<dyn EndpointMatcher>>,
}

impl EndpointResolver {
    pub fn new(matchers: Vec<Box<dyn EndpointMatcher>>) -> Self {
        Self { matchers }
    }

    /// Standard resolution order for the given gateway configuration.
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(vec![
            Box::new(QueryParamMatcher::new(ENDPOINT_PARAM)),
            Box::new(PathSuffixMatcher::new(&config.path_segment)),
            Box::new(PathSuffixMatcher::new(LEGACY_API_SEGMENT)),
        ])
    }

    /// Resolve the logical backend path for an inbound URI.
    pub fn resolve(&self, uri: &Uri) -> Result<LogicalPath, InvalidEndpoint> {
        self.matchers
            .iter()
            .find_map(|m| m.extract(uri))
            .and_then(|raw| LogicalPath::new(&raw))
            .ok_or_else(|| InvalidEndpoint {
                path: uri.path().to_string(),
            })
    }
}
