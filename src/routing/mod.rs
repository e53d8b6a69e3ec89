//! Endpoint routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → router.rs (EndpointResolver, ordered lookup)
//!     → matcher.rs (query param / path suffix extraction)
//!     → Return: LogicalPath or InvalidEndpoint
//! ```
//!
//! # Design Decisions
//! - Matchers compiled at startup from GatewayConfig, immutable at runtime
//! - Deterministic: same input always resolves to the same path
//! - First match wins

pub mod matcher;
pub mod router;

pub use router::{EndpointResolver, InvalidEndpoint, LogicalPath};
