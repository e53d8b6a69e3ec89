//! Skin subsystem: article rendering through interchangeable templates.
//!
//! # Data Flow
//! ```text
//! Article (from backend) + skin id
//!     → registry.rs (fetch skin list, first id match)
//!     → renderer.rs (read template)
//!         ok  → template.rs (placeholder substitution)
//!         err → fallback.rs (fixed layout + diagnostic banner)
//!     → HTML
//! ```

pub mod fallback;
pub mod registry;
pub mod renderer;
pub mod template;
pub mod types;

pub use registry::{RegistryError, SkinRegistry};
pub use renderer::{SkinRenderer, TemplateUnavailable};
pub use types::{Article, Skin};
