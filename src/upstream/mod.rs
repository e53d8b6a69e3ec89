//! Upstream API client subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway / SkinRegistry / page assembly
//!     → client.rs (compose URL, one HTTP exchange, buffer body)
//!     → Backend API
//!     ← UpstreamResponse | TransportError (error.rs)
//! ```
//!
//! # Design Decisions
//! - At-most-once: a failed mutating call may still have been applied
//! - Timeouts surface as the same error family as connection failures

pub mod client;
pub mod error;

pub use client::{UpstreamClient, UpstreamRequest, UpstreamResponse};
pub use error::TransportError;
