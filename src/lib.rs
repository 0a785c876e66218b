//! Bounded-concurrency HTTP health-check engine.
//!
//! Probes a list of targets with GET requests, never more than
//! `max_concurrency` at a time, and aggregates the outcomes into
//! torn-free snapshots while the batch runs.

pub mod check;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod report;
pub mod reporter;
pub mod runner;
pub mod stats;

pub use check::{CheckError, CheckResult, Target};
pub use config::HealthRunnerConfig;
pub use lifecycle::Shutdown;
pub use reporter::Reporter;
pub use runner::{BatchOutcome, ResultSink, Runner};
pub use stats::{StatsAggregator, StatsSnapshot};
