//! Rate-limited edge reverse-proxy router.
//!
//! Binds mount prefixes to third-party upstream APIs, rewrites paths,
//! injects per-upstream credentials, and passes responses back verbatim.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod upstream;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
