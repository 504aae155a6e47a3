//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → mount.rs (longest-prefix lookup)
//!     → rewrite.rs (strip the mount prefix for the upstream path)
//!     → Return: matched Mount or no match
//!
//! Mount compilation (at startup):
//!     MountConfig[]
//!     → Compile patterns (literal prefix + wildcard flag)
//!     → Sort by prefix length, longest first
//!     → Freeze as immutable MountTable
//! ```
//!
//! # Design Decisions
//! - Mounts compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same path always matches same mount
//! - Longest literal prefix wins

pub mod mount;
pub mod rewrite;

pub use mount::{Mount, MountTable};
pub use rewrite::rewrite_path;
