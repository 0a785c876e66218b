//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Run (binary):
//!     Load config → Validate → Build runner → Spawn reporter → Run batch
//!
//! Shutdown (shutdown.rs):
//!     Batch finished → trigger → reporter exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → batch stops admitting, grace period, abort
//! ```
//!
//! # Design Decisions
//! - Fail fast: config and client errors abort before any check
//! - Interruption is reported, never a crash
//! - Shutdown has timeout: outstanding checks are abandoned after the grace period

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
