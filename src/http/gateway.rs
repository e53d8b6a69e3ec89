//! Request forwarding gateway.
//!
//! # Responsibilities
//! - Turn an inbound browser request into a ProxyRequest (method, endpoint, body)
//! - Forward it to `<base_url>/api/<logical_path>` with filtered headers
//! - Translate the outcome into exactly one ProxyResponse
//!
//! # Design Decisions
//! - Stateless and single-shot: Resolving → Forwarding → Translating → Done
//! - No retries; a timed-out DELETE/PUT may still have been applied
//! - Transport failures are normalized here and nowhere else
//! - 5xx bodies that are not JSON get wrapped so the browser always parses JSON

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{BenderConfig, GatewayConfig};
use crate::http::request::{ProxyMethod, ProxyRequest};
use crate::http::response::{ProxyResponse, JSON_CONTENT_TYPE};
use crate::observability::metrics;
use crate::routing::EndpointResolver;
use crate::upstream::{UpstreamClient, UpstreamRequest, UpstreamResponse};

/// Inbound headers never copied upstream.
///
/// `Content-Type` is fixed by the gateway itself; the rest are either
/// recomputed by the client or hop-by-hop.
const BLOCKED_HEADERS: [HeaderName; 8] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::CONTENT_TYPE,
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    header::TE,
    header::UPGRADE,
    header::PROXY_AUTHORIZATION,
];

/// Forwards browser API calls to the backend.
#[derive(Clone)]
pub struct Gateway {
    upstream: UpstreamClient,
    resolver: Arc<EndpointResolver>,
    total_timeout: Duration,
    max_body_bytes: usize,
}

impl Gateway {
    pub fn new(
        upstream: UpstreamClient,
        gateway: &GatewayConfig,
        total_timeout: Duration,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            upstream,
            resolver: Arc::new(EndpointResolver::from_config(gateway)),
            total_timeout,
            max_body_bytes,
        }
    }

    pub fn from_config(upstream: UpstreamClient, config: &BenderConfig) -> Self {
        Self::new(
            upstream,
            &config.gateway,
            config.timeouts.request(),
            config.listener.max_body_bytes,
        )
    }

    /// Handle a raw inbound request end to end.
    pub async fn handle(&self, request: Request<Body>) -> ProxyResponse {
        let method = match ProxyMethod::try_from(request.method()) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(method = %e.0, path = %request.uri().path(), "Rejected method");
                return ProxyResponse::method_not_allowed();
            }
        };

        let logical_path = match self.resolver.resolve(request.uri()) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(path = %e.path, "No API endpoint in request");
                return ProxyResponse::invalid_endpoint();
            }
        };

        let (parts, body) = request.into_parts();
        let proxy_request = ProxyRequest::new(method, logical_path, &parts.headers);

        let proxy_request = if method.is_mutating() {
            match axum::body::to_bytes(body, self.max_body_bytes).await {
                Ok(bytes) => proxy_request.with_body(bytes),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read request body");
                    return ProxyResponse::unreadable_body(&e.to_string());
                }
            }
        } else {
            proxy_request
        };

        self.forward(proxy_request).await
    }

    /// Forward one request; always yields a well-formed response.
    pub async fn forward(&self, request: ProxyRequest) -> ProxyResponse {
        let url = self.upstream.api_url(request.logical_path.as_str());
        let method = request.method;
        let upstream_request = UpstreamRequest {
            method: method.into(),
            url: url.clone(),
            headers: outbound_headers(&request.headers),
            body: outbound_body(&request),
        };

        let start = Instant::now();
        let result = self
            .upstream
            .send(upstream_request, self.total_timeout)
            .await;
        let elapsed = start.elapsed();

        match result {
            Ok(response) => {
                tracing::info!(
                    method = method.as_str(),
                    url = %url,
                    duration_ms = elapsed.as_millis() as u64,
                    status = response.status.as_u16(),
                    "Gateway request completed"
                );
                metrics::record_gateway_request(method.as_str(), response.status.as_u16(), elapsed);
                translate(response)
            }
            Err(e) => {
                tracing::error!(
                    method = method.as_str(),
                    url = %url,
                    duration_ms = elapsed.as_millis() as u64,
                    error = %e,
                    code = e.code(),
                    "Gateway request failed"
                );
                metrics::record_gateway_request(method.as_str(), 500, elapsed);
                metrics::record_transport_failure(e.code());
                ProxyResponse::transport_failure(&e)
            }
        }
    }
}

/// Inbound headers minus the blocklist, plus fixed JSON negotiation.
pub fn outbound_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.keys_len() + 2);
    for (name, value) in inbound {
        if !BLOCKED_HEADERS.contains(name) {
            headers.insert(name.clone(), value.clone());
        }
    }
    headers.insert(header::ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers
}

/// Raw body if present, else form fields re-serialized as a JSON object.
pub fn outbound_body(request: &ProxyRequest) -> Option<Bytes> {
    if !request.method.is_mutating() {
        return None;
    }
    if let Some(body) = request.body.as_ref().filter(|b| !b.is_empty()) {
        return Some(body.clone());
    }
    if request.form.is_empty() {
        return None;
    }
    let fields: serde_json::Map<String, serde_json::Value> = request
        .form
        .iter()
        .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
        .collect();
    Some(Bytes::from(serde_json::Value::Object(fields).to_string()))
}

/// Map a completed backend exchange to the browser response.
pub fn translate(response: UpstreamResponse) -> ProxyResponse {
    if response.status.is_server_error()
        && serde_json::from_slice::<serde_json::Value>(&response.body).is_err()
    {
        tracing::warn!(status = response.status.as_u16(), "Backend returned non-JSON server error");
        return ProxyResponse::backend_error(response.status, &response.body);
    }

    let content_type = response
        .content_type()
        .unwrap_or(JSON_CONTENT_TYPE)
        .to_string();

    ProxyResponse {
        status: response.status,
        content_type: Some(content_type),
        body: response.body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendConfig, TimeoutConfig};
    use crate::routing::LogicalPath;
    use axum::http::StatusCode;

    fn upstream_response(status: u16, content_type: Option<&str>, body: &'static [u8]) -> UpstreamResponse {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(ct).unwrap());
        }
        UpstreamResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers,
            body: Bytes::from_static(body),
        }
    }

    fn request(method: ProxyMethod) -> ProxyRequest {
        ProxyRequest::new(method, LogicalPath::new("articles").unwrap(), &HeaderMap::new())
    }

    #[test]
    fn test_success_body_relayed_unchanged() {
        let response = translate(upstream_response(200, Some("application/json"), b"{\"id\":5}"));
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(&response.body[..], b"{\"id\":5}");
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn test_missing_content_type_labeled_json() {
        let response = translate(upstream_response(201, None, b"{\"success\":true}"));
        assert_eq!(response.content_type.as_deref(), Some(JSON_CONTENT_TYPE));
    }

    #[test]
    fn test_client_error_not_reinterpreted() {
        let response = translate(upstream_response(404, Some("text/html"), b"not json"));
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(&response.body[..], b"not json");
        assert_eq!(response.content_type.as_deref(), Some("text/html"));
    }

    #[test]
    fn test_server_error_non_json_wrapped() {
        let response = translate(upstream_response(503, Some("text/plain"), b"oops"));
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Backend server error");
        assert_eq!(body["details"], "oops");
    }

    #[test]
    fn test_server_error_json_relayed() {
        let response = translate(upstream_response(500, None, b"{\"error\":\"Database error occurred\"}"));
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(&response.body[..], b"{\"error\":\"Database error occurred\"}");
    }

    #[test]
    fn test_outbound_headers_filtered() {
        let mut inbound = HeaderMap::new();
        inbound.insert(header::HOST, HeaderValue::from_static("frontend.local"));
        inbound.insert(header::CONTENT_LENGTH, HeaderValue::from_static("12"));
        inbound.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        inbound.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        inbound.insert(header::COOKIE, HeaderValue::from_static("session=abc"));
        inbound.insert("x-request-id", HeaderValue::from_static("req-1"));

        let headers = outbound_headers(&inbound);
        assert!(headers.get(header::HOST).is_none());
        assert!(headers.get(header::CONTENT_LENGTH).is_none());
        assert_eq!(headers[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert_eq!(headers[header::ACCEPT], JSON_CONTENT_TYPE);
        assert_eq!(headers[header::COOKIE], "session=abc");
        assert_eq!(headers["x-request-id"], "req-1");
    }

    #[test]
    fn test_outbound_body_prefers_raw() {
        let mut req = request(ProxyMethod::Put);
        req.body = Some(Bytes::from_static(b"{\"title\":\"x\"}"));
        req.form = vec![("ignored".into(), "1".into())];
        assert_eq!(outbound_body(&req).unwrap(), Bytes::from_static(b"{\"title\":\"x\"}"));
    }

    #[test]
    fn test_outbound_body_falls_back_to_form_json() {
        let mut req = request(ProxyMethod::Post);
        req.form = vec![
            ("username".into(), "bender".into()),
            ("password".into(), "s3cret".into()),
        ];
        let body = outbound_body(&req).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, serde_json::json!({"username": "bender", "password": "s3cret"}));
    }

    #[test]
    fn test_outbound_body_empty() {
        assert!(outbound_body(&request(ProxyMethod::Delete)).is_none());

        let mut get = request(ProxyMethod::Get);
        get.body = Some(Bytes::from_static(b"{}"));
        assert!(outbound_body(&get).is_none());
    }

    fn unreachable_gateway() -> Gateway {
        let upstream = UpstreamClient::new(
            &BackendConfig {
                base_url: "http://127.0.0.1:1".into(),
                ..Default::default()
            },
            &TimeoutConfig::default(),
        );
        Gateway::new(upstream, &GatewayConfig::default(), Duration::from_secs(5), 1024)
    }

    #[tokio::test]
    async fn test_unreachable_backend_synthesizes_500() {
        let gateway = unreachable_gateway();
        for method in [
            ProxyMethod::Get,
            ProxyMethod::Post,
            ProxyMethod::Put,
            ProxyMethod::Patch,
            ProxyMethod::Delete,
        ] {
            let response = gateway.forward(request(method)).await;
            assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
            let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "API request failed");
            assert_eq!(body["code"], "connect");
        }
    }

    #[tokio::test]
    async fn test_handle_rejects_unresolvable_path() {
        let gateway = unreachable_gateway();
        let request = Request::builder()
            .uri("/dashboard")
            .body(Body::empty())
            .unwrap();
        let response = gateway.handle(request).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["error"], "Invalid API endpoint");
    }

    #[tokio::test]
    async fn test_handle_rejects_unsupported_method() {
        let gateway = unreachable_gateway();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api_proxy/articles")
            .body(Body::empty())
            .unwrap();
        let response = gateway.handle(request).await;
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
