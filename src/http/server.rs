//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, timeout, request ID)
//! - Dispatch API calls to the gateway and article pages to the renderer
//! - Bind server to listener and shut down gracefully

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderName, Request},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::BenderConfig;
use crate::http::gateway::Gateway;
use crate::http::pages::ArticlePages;
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::lifecycle::signals::shutdown_signal;
use crate::upstream::UpstreamClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
    pub pages: ArticlePages,
}

impl AppState {
    pub fn from_config(config: &BenderConfig) -> Self {
        let upstream = UpstreamClient::new(&config.backend, &config.timeouts);
        Self {
            gateway: Gateway::from_config(upstream.clone(), config),
            pages: ArticlePages::from_config(upstream, config),
        }
    }
}

/// HTTP server for the site frontend.
pub struct HttpServer {
    router: Router,
    config: BenderConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: BenderConfig) -> Self {
        let state = AppState::from_config(&config);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &BenderConfig, state: AppState) -> Router {
        let segment = &config.gateway.path_segment;
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        // Outer deadline; the gateway's own total timeout fires first and
        // produces the JSON envelope.
        let deadline =
            Duration::from_secs(config.timeouts.request_secs + config.timeouts.connect_secs);

        Router::new()
            .route("/healthz", get(health_handler))
            .route("/articles/{id}", get(article_handler))
            .route(&format!("/{segment}"), any(gateway_handler))
            .route(&format!("/{segment}/"), any(gateway_handler))
            .route(&format!("/{segment}/{{*rest}}"), any(gateway_handler))
            .route("/api", any(gateway_handler))
            .route("/api/", any(gateway_handler))
            .route("/api/{*rest}", any(gateway_handler))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(deadline))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuidV4))
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.backend.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Browser API calls: resolve endpoint, forward, relay.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> impl IntoResponse {
    state.gateway.handle(request).await
}

async fn article_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    state.pages.article_page(&id).await
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
