//! Upstream-facing subsystem.
//!
//! # Data Flow
//! ```text
//! Matched mount + request
//!     → credentials.rs (resolve the injection rule for the upstream base)
//!     → forwarder.rs (build URL, apply headers, dispatch, pass through)
//!     → Response returned verbatim to the caller
//! ```
//!
//! # Design Decisions
//! - Secrets resolve from the environment at request time, never cached
//! - Bodies stream in both directions; nothing is buffered
//! - Upstream failures map to 502; the upstream's own error responses pass
//!   through untouched

pub mod credentials;
pub mod forwarder;

pub use credentials::{Credential, CredentialStore};
pub use forwarder::{ForwardError, Forwarder};
