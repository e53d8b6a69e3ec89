//! Endpoint extraction rules.
//!
//! # Responsibilities
//! - Pull a candidate backend endpoint out of an inbound URI
//! - One matcher per convention: query parameter, gateway path, legacy `/api/` path
//!
//! # Design Decisions
//! - Matchers only extract; trimming and emptiness checks live in the resolver
//! - Path suffixes keep the inbound query string so backend filters survive
//! - No regex: plain substring search on the path

use axum::http::Uri;
use url::form_urlencoded;

/// Trait for extracting a backend endpoint from a request URI.
pub trait EndpointMatcher: Send + Sync + std::fmt::Debug {
    /// Returns the raw endpoint if this convention applies to the URI.
    fn extract(&self, uri: &Uri) -> Option<String>;
}

/// Reads an explicit query parameter (`?endpoint=articles/7`).
#[derive(Debug, Clone)]
pub struct QueryParamMatcher {
    name: String,
}

impl QueryParamMatcher {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl EndpointMatcher for QueryParamMatcher {
    fn extract(&self, uri: &Uri) -> Option<String> {
        let query = uri.query()?;
        // Repeated parameters: the last one wins.
        form_urlencoded::parse(query.as_bytes())
            .filter(|(key, _)| key == self.name.as_str())
            .map(|(_, value)| value.into_owned())
            .last()
    }
}

/// Takes everything after a fixed path segment (`/api_proxy/articles/7`).
#[derive(Debug, Clone)]
pub struct PathSuffixMatcher {
    marker: String,
}

impl PathSuffixMatcher {
    /// `segment` is the bare segment name, e.g. `api_proxy` or `api`.
    pub fn new(segment: &str) -> Self {
        Self {
            marker: format!("/{}/", segment.trim_matches('/')),
        }
    }
}

impl EndpointMatcher for PathSuffixMatcher {
    fn extract(&self, uri: &Uri) -> Option<String> {
        let path = uri.path();
        let start = path.find(&self.marker)? + self.marker.len();
        let mut endpoint = path[start..].to_string();
        if let Some(query) = uri.query() {
            endpoint.push('?');
            endpoint.push_str(query);
        }
        Some(endpoint)
    }
}
