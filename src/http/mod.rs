//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Browser request
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → gateway.rs (API calls)
//!         → request.rs (method, headers, body → ProxyRequest)
//!         → routing (endpoint resolution)
//!         → upstream (backend exchange)
//!         → response.rs (ProxyResponse, error envelopes)
//!     → pages.rs (article pages → skins renderer)
//!     → Send to browser
//! ```

pub mod gateway;
pub mod pages;
pub mod request;
pub mod response;
pub mod server;

pub use gateway::Gateway;
pub use request::{ProxyMethod, ProxyRequest, X_REQUEST_ID};
pub use response::ProxyResponse;
pub use server::{AppState, HttpServer};
