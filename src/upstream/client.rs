//! Single-shot HTTP client for the backend API.
//!
//! # Responsibilities
//! - Build `<base_url>/api/<logical_path>` URLs
//! - Issue exactly one request per call (no retries, no coalescing)
//! - Enforce the connect timeout (connector) and total timeout (whole exchange)
//! - Buffer the response body (up to `max_response_bytes`) so callers get an
//!   all-or-nothing result

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::Duration;
use tokio::time::timeout;

use crate::config::{BackendConfig, TimeoutConfig};
use crate::upstream::error::TransportError;

/// A request ready to be sent to the backend.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// A fully buffered backend response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// The `Content-Type` header, if present and non-empty.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }
}

/// HTTP client bound to one backend base URL.
#[derive(Clone)]
pub struct UpstreamClient {
    base_url: String,
    max_response_bytes: usize,
    client: Client<HttpConnector, Body>,
}

impl UpstreamClient {
    /// Create a client for the configured backend.
    ///
    /// The connect timeout is applied by the connector; total timeouts are
    /// passed per call because listing calls use a shorter budget.
    pub fn new(backend: &BackendConfig, timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeouts.connect()));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            base_url: backend.base_url.trim_end_matches('/').to_string(),
            max_response_bytes: backend.max_response_bytes,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute backend URL for a logical API path.
    pub fn api_url(&self, logical_path: &str) -> String {
        format!("{}/api/{}", self.base_url, logical_path)
    }

    /// Send one request and buffer the whole response within `total`.
    pub async fn send(
        &self,
        request: UpstreamRequest,
        total: Duration,
    ) -> Result<UpstreamResponse, TransportError> {
        let uri: Uri = request
            .url
            .parse()
            .map_err(|e: axum::http::uri::InvalidUri| TransportError::InvalidUrl {
                url: request.url.clone(),
                reason: e.to_string(),
            })?;

        let mut req = Request::builder()
            .method(request.method)
            .uri(uri)
            .body(request.body.map(Body::from).unwrap_or_else(Body::empty))
            .map_err(|e| TransportError::Request(e.to_string()))?;
        *req.headers_mut() = request.headers;

        match timeout(total, self.exchange(req)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(total)),
        }
    }

    /// `GET /api/<logical_path>` with the given total timeout.
    pub async fn get(
        &self,
        logical_path: &str,
        total: Duration,
    ) -> Result<UpstreamResponse, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::ACCEPT,
            axum::http::HeaderValue::from_static("application/json"),
        );
        self.send(
            UpstreamRequest {
                method: Method::GET,
                url: self.api_url(logical_path),
                headers,
                body: None,
            },
            total,
        )
        .await
    }

    async fn exchange(&self, req: Request<Body>) -> Result<UpstreamResponse, TransportError> {
        let response = self.client.request(req).await.map_err(|e| {
            if e.is_connect() {
                TransportError::Connect(error_chain(&e))
            } else {
                TransportError::Request(error_chain(&e))
            }
        })?;

        let (parts, body): (_, Incoming) = response.into_parts();
        let body = axum::body::to_bytes(Body::new(body), self.max_response_bytes)
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(UpstreamResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}

/// hyper-util wraps the interesting cause ("Connection refused") a level down.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
