//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway / renderer produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the browser request into the backend call
//! - Observability is never part of a response contract

pub mod logging;
pub mod metrics;
