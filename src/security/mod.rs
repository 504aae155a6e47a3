//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (derive per-IP key, fixed-window check)
//!     → status route: decision recorded in extensions, never enforced
//!     → proxied mounts: optional 429 enforcement (config-gated)
//! ```
//!
//! # Design Decisions
//! - The counter store is the only shared mutable state in the process
//! - Increment-and-check is atomic per key to stay honest under bursts
//! - IP-less callers share one bucket rather than being rejected

pub mod rate_limit;

pub use rate_limit::{FixedWindowLimiter, RateLimitDecision, RateLimiterState};
