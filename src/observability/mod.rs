//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout/stderr via tracing-subscriber
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (target_id, batch_id, latency_ms)
//! - Metrics are cheap no-ops until a recorder is installed
//! - Progress lines are ordinary info events

pub mod logging;
pub mod metrics;
