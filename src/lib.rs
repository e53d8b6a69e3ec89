//! Bender site frontend: API gateway and skinned article rendering.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod skins;
pub mod upstream;

pub use config::schema::BenderConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
