//! Thread-safe statistics aggregation.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::check::CheckResult;
use crate::stats::snapshot::StatsSnapshot;

/// Serializes every mutation of the run's counters.
///
/// Shared between workers through an `Arc`; `record` is the single point of
/// contention.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    state: Mutex<StatsSnapshot>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed check into the counters.
    pub fn record(&self, result: &CheckResult) {
        let mut state = self.lock();
        state.total += 1;
        if result.is_success() {
            state.success += 1;
        } else {
            state.failures += 1;
        }
        if result.error().is_some() {
            state.errors += 1;
        }
        state.total_latency = state.total_latency.saturating_add(result.latency());
    }

    /// Copy of all counters taken under the lock.
    pub fn snapshot(&self) -> StatsSnapshot {
        *self.lock()
    }

    // The update cannot panic half-way, so a poisoned lock still holds a
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, StatsSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{CheckError, Target};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, SystemTime};
    use url::Url;

    fn target() -> Arc<Target> {
        Arc::new(Target::new("t", Url::parse("http://127.0.0.1/health").unwrap()))
    }

    fn result(i: u64) -> CheckResult {
        let latency = Duration::from_millis(1);
        match i % 3 {
            0 => CheckResult::from_status(target(), 200, latency, SystemTime::now()),
            1 => CheckResult::from_status(target(), 500, latency, SystemTime::now()),
            _ => CheckResult::from_error(target(), CheckError::Timeout(latency), latency, SystemTime::now()),
        }
    }

    #[test]
    fn test_record_updates_all_fields() {
        let stats = StatsAggregator::new();
        for i in 0..3 {
            stats.record(&result(i));
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.success, 1);
        assert_eq!(snapshot.failures, 2);
        assert_eq!(snapshot.errors, 1);
        assert_eq!(snapshot.total_latency, Duration::from_millis(3));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let stats = StatsAggregator::new();
        let before = stats.snapshot();
        stats.record(&result(0));
        assert_eq!(before.total, 0);
        assert_eq!(stats.snapshot().total, 1);
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let stats = Arc::new(StatsAggregator::new());
        let writers: Vec<_> = (0..8)
            .map(|_| {
                let stats = stats.clone();
                thread::spawn(move || {
                    for i in 0..300 {
                        stats.record(&result(i));
                    }
                })
            })
            .collect();

        let reader = {
            let stats = stats.clone();
            thread::spawn(move || {
                let mut last = 0;
                for _ in 0..1000 {
                    let s = stats.snapshot();
                    assert_eq!(s.success + s.failures, s.total);
                    assert!(s.errors <= s.failures);
                    assert!(s.total >= last);
                    last = s.total;
                }
            })
        };

        for w in writers {
            w.join().unwrap();
        }
        reader.join().unwrap();

        let s = stats.snapshot();
        assert_eq!(s.total, 2400);
        assert_eq!(s.success, 800);
        assert_eq!(s.errors, 800);
        assert_eq!(s.total_latency, Duration::from_millis(2400));
    }
}
