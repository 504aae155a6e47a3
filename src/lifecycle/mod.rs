//! Lifecycle subsystem.
//!
//! # Design Decisions
//! - One broadcast channel coordinates shutdown across the server loop and
//!   background tasks
//! - Ctrl+C is the only built-in trigger; tests trigger directly

pub mod shutdown;

pub use shutdown::Shutdown;
