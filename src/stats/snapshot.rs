//! Point-in-time statistics.

use serde::Serialize;
use std::time::Duration;

/// Aggregate counters at one instant.
///
/// Invariants: `success + failures == total` and `errors <= failures`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub total: u64,
    pub success: u64,
    pub failures: u64,
    pub errors: u64,
    #[serde(serialize_with = "crate::report::serialize_millis")]
    pub total_latency: Duration,
}

impl StatsSnapshot {
    /// Mean latency, or `None` before the first check completes.
    pub fn average_latency(&self) -> Option<Duration> {
        if self.total == 0 {
            return None;
        }
        let nanos = self.total_latency.as_nanos() / u128::from(self.total);
        Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
    }

    /// `count` as a percentage of `total`, or `None` when nothing ran.
    pub fn percent(&self, count: u64) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(count as f64 / self.total as f64 * 100.0)
    }
}
