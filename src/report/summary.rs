//! Summary of a finished run.
//!
//! Always rendered, even when every check failed. Failures and errors are
//! reported separately so "reachable but unhealthy" and "unreachable" can be
//! told apart.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::stats::StatsSnapshot;

/// Runs shorter than this have no meaningful throughput.
const MIN_THROUGHPUT_WINDOW: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: u64,
    pub success: u64,
    pub failures: u64,
    pub errors: u64,
    pub success_pct: Option<f64>,
    pub failure_pct: Option<f64>,
    pub error_pct: Option<f64>,
    #[serde(rename = "average_latency_ms", serialize_with = "super::serialize_opt_millis")]
    pub average_latency: Option<Duration>,
    #[serde(rename = "elapsed_ms", serialize_with = "super::serialize_millis")]
    pub elapsed: Duration,
    /// Checks per second.
    pub throughput: Option<f64>,
    /// Results the sink had to drop, when a sink was attached.
    pub dropped_results: Option<u64>,
    pub interrupted: bool,
}

impl Summary {
    pub fn new(snapshot: &StatsSnapshot, elapsed: Duration) -> Self {
        let throughput = if elapsed >= MIN_THROUGHPUT_WINDOW {
            Some(snapshot.total as f64 / elapsed.as_secs_f64())
        } else {
            None
        };

        Self {
            total: snapshot.total,
            success: snapshot.success,
            failures: snapshot.failures,
            errors: snapshot.errors,
            success_pct: snapshot.percent(snapshot.success),
            failure_pct: snapshot.percent(snapshot.failures),
            error_pct: snapshot.percent(snapshot.errors),
            average_latency: snapshot.average_latency(),
            elapsed,
            throughput,
            dropped_results: None,
            interrupted: false,
        }
    }

    pub fn with_dropped_results(mut self, dropped: u64) -> Self {
        self.dropped_results = Some(dropped);
        self
    }

    pub fn with_interrupted(mut self, interrupted: bool) -> Self {
        self.interrupted = interrupted;
        self
    }
}

fn count_line(f: &mut fmt::Formatter<'_>, label: &str, count: u64, pct: Option<f64>) -> fmt::Result {
    match pct {
        Some(pct) => writeln!(f, "{}: {} ({:.2}%)", label, count, pct),
        None => writeln!(f, "{}: {}", label, count),
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Final Results ===")?;
        if self.interrupted {
            writeln!(f, "(run interrupted before every target was checked)")?;
        }
        writeln!(f, "Total targets checked: {}", self.total)?;
        count_line(f, "Success", self.success, self.success_pct)?;
        count_line(f, "Failures", self.failures, self.failure_pct)?;
        count_line(f, "Errors", self.errors, self.error_pct)?;
        if let Some(avg) = self.average_latency {
            writeln!(f, "Average latency: {:?}", avg)?;
        }
        writeln!(f, "Total time: {:?}", self.elapsed)?;
        if let Some(throughput) = self.throughput {
            writeln!(f, "Throughput: {:.2} checks/second", throughput)?;
        }
        if let Some(dropped) = self.dropped_results {
            writeln!(f, "Dropped results: {}", dropped)?;
        }
        Ok(())
    }
}
