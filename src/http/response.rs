//! Response handling and transformation.
//!
//! # Responsibilities
//! - Carry a fully buffered response back to the browser
//! - Build the JSON error envelopes the browser scripts expect
//! - Relay backend status and content type unchanged
//!
//! # Design Decisions
//! - Responses are buffered: never partially written
//! - Missing upstream content type is labeled JSON

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::upstream::TransportError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// The single response produced for a ProxyRequest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl ProxyResponse {
    /// JSON response with the given status.
    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some(JSON_CONTENT_TYPE.to_string()),
            body: Bytes::from(value.to_string()),
        }
    }

    /// No backend endpoint could be derived from the request.
    pub fn invalid_endpoint() -> Self {
        Self::json(
            StatusCode::NOT_FOUND,
            &json!({ "success": false, "error": "Invalid API endpoint" }),
        )
    }

    pub fn method_not_allowed() -> Self {
        Self::json(
            StatusCode::METHOD_NOT_ALLOWED,
            &json!({ "success": false, "error": "Method not allowed" }),
        )
    }

    pub fn unreadable_body(details: &str) -> Self {
        Self::json(
            StatusCode::BAD_REQUEST,
            &json!({
                "success": false,
                "error": "Failed to read request body",
                "details": details,
            }),
        )
    }

    /// The backend was unreachable or timed out.
    pub fn transport_failure(err: &TransportError) -> Self {
        Self::json(
            StatusCode::INTERNAL_SERVER_ERROR,
            &json!({
                "success": false,
                "error": "API request failed",
                "details": err.to_string(),
                "code": err.code(),
            }),
        )
    }

    /// A 5xx backend body that was not JSON, wrapped so the browser can parse it.
    pub fn backend_error(status: StatusCode, raw_body: &[u8]) -> Self {
        Self::json(
            status,
            &json!({
                "success": false,
                "error": "Backend server error",
                "details": String::from_utf8_lossy(raw_body),
            }),
        )
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let content_type = self
            .content_type
            .as_deref()
            .and_then(|v| HeaderValue::from_str(v).ok())
            .unwrap_or_else(|| HeaderValue::from_static(JSON_CONTENT_TYPE));

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
        response
    }
}
