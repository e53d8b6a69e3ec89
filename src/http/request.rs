//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) for tracing
//! - Restrict forwarded methods to the backend's verb set
//! - Normalize inbound headers (case-insensitive, last write wins)
//! - Decode legacy form submissions into form fields
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Bodies on GET requests are dropped at construction, never forwarded

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, Request};
use thiserror::Error;
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;
use uuid::Uuid;

use crate::routing::LogicalPath;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates `x-request-id` values for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Methods the gateway forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl ProxyMethod {
    /// Methods that carry a request body upstream.
    pub fn is_mutating(self) -> bool {
        !matches!(self, ProxyMethod::Get)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProxyMethod::Get => "GET",
            ProxyMethod::Post => "POST",
            ProxyMethod::Put => "PUT",
            ProxyMethod::Patch => "PATCH",
            ProxyMethod::Delete => "DELETE",
        }
    }
}

impl From<ProxyMethod> for Method {
    fn from(method: ProxyMethod) -> Self {
        match method {
            ProxyMethod::Get => Method::GET,
            ProxyMethod::Post => Method::POST,
            ProxyMethod::Put => Method::PUT,
            ProxyMethod::Patch => Method::PATCH,
            ProxyMethod::Delete => Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Method not allowed: {0}")]
pub struct UnsupportedMethod(pub Method);

impl TryFrom<&Method> for ProxyMethod {
    type Error = UnsupportedMethod;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        match *method {
            Method::GET => Ok(ProxyMethod::Get),
            Method::POST => Ok(ProxyMethod::Post),
            Method::PUT => Ok(ProxyMethod::Put),
            Method::PATCH => Ok(ProxyMethod::Patch),
            Method::DELETE => Ok(ProxyMethod::Delete),
            _ => Err(UnsupportedMethod(method.clone())),
        }
    }
}

/// A browser request bound for the backend API.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: ProxyMethod,
    pub logical_path: LogicalPath,
    /// One value per header name.
    pub headers: HeaderMap,
    /// Raw inbound body; only ever `Some` for mutating methods.
    pub body: Option<Bytes>,
    /// Decoded form fields from a form-encoded submission, in arrival order.
    pub form: Vec<(String, String)>,
}

impl ProxyRequest {
    pub fn new(method: ProxyMethod, logical_path: LogicalPath, headers: &HeaderMap) -> Self {
        Self {
            method,
            logical_path,
            headers: collapse_headers(headers),
            body: None,
            form: Vec::new(),
        }
    }

    /// Attach the inbound body.
    ///
    /// Form-encoded bodies become form fields; anything else is kept raw.
    /// Ignored for non-mutating methods.
    pub fn with_body(mut self, body: Bytes) -> Self {
        if !self.method.is_mutating() || body.is_empty() {
            return self;
        }
        if is_form_encoded(&self.headers) {
            self.form = form_urlencoded::parse(&body).into_owned().collect();
        } else {
            self.body = Some(body);
        }
        self
    }
}

/// Keep the last value seen for each header name.
pub fn collapse_headers(headers: &HeaderMap) -> HeaderMap {
    let mut collapsed = HeaderMap::with_capacity(headers.keys_len());
    for (name, value) in headers {
        collapsed.insert(name.clone(), value.clone());
    }
    collapsed
}

fn is_form_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
        .unwrap_or(false)
}
