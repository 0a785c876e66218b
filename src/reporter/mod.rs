//! Periodic progress reporting.
//!
//! # Responsibilities
//! - Sample the aggregator on a fixed interval
//! - Emit one progress line per tick once at least one check has completed
//! - Stop when the shutdown signal fires
//!
//! # Design Decisions
//! - Ticks with `total == 0` emit nothing
//! - The reporter only reads snapshots; it never affects the run
//! - Shutdown is observed in the same `select!` as the tick, so it is never
//!   later than one interval

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::stats::{StatsAggregator, StatsSnapshot};

/// tokio intervals reject a zero period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// One progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub total: u64,
    pub success: u64,
    pub failures: u64,
    pub errors: u64,
    pub average_latency: Duration,
}

impl Progress {
    /// `None` until at least one check has completed.
    pub fn from_snapshot(snapshot: &StatsSnapshot) -> Option<Self> {
        let average_latency = snapshot.average_latency()?;
        Some(Self {
            total: snapshot.total,
            success: snapshot.success,
            failures: snapshot.failures,
            errors: snapshot.errors,
            average_latency,
        })
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Progress] Total: {} | Success: {} | Failures: {} | Errors: {} | Avg Latency: {:?}",
            self.total, self.success, self.failures, self.errors, self.average_latency
        )
    }
}

/// Background task printing progress while a batch runs.
pub struct Reporter {
    stats: Arc<StatsAggregator>,
    interval: Duration,
}

impl Reporter {
    pub fn new(stats: Arc<StatsAggregator>, interval: Duration) -> Self {
        Self {
            stats,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    /// Run until `shutdown` fires (or its sender is dropped). Returns the
    /// number of progress lines emitted.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> u64 {
        tracing::debug!(interval_ms = self.interval.as_millis() as u64, "Reporter starting");

        // First tick one interval from now, not immediately.
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut emitted = 0;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.tick() {
                        emitted += 1;
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!(emitted, "Reporter received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        emitted
    }

    fn tick(&self) -> bool {
        let snapshot = self.stats.snapshot();
        match Progress::from_snapshot(&snapshot) {
            Some(progress) => {
                tracing::info!(
                    total = progress.total,
                    success = progress.success,
                    failures = progress.failures,
                    errors = progress.errors,
                    avg_latency_ms = progress.average_latency.as_secs_f64() * 1000.0,
                    "{}",
                    progress
                );
                true
            }
            None => false,
        }
    }
}
