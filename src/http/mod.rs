//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, status route + mount catch-all)
//!     → request.rs (request ID, trusted client-IP key)
//!     → [mount table picks the upstream]
//!     → [forwarder dispatches and passes the response through]
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{client_key, MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
