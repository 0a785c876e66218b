//! Best-effort result sink.
//!
//! # Responsibilities
//! - Hand completed results to an optional consumer
//! - Never block a worker: pushes that do not fit are dropped
//! - Count drops so an operator can see how much was lost
//!
//! # Design Decisions
//! - Bounded `mpsc` channel fed with `try_send`; capacity is fixed and
//!   independent of the target count
//! - A closed consumer is treated like a full one
//! - Stats never depend on the sink; dropped results are still counted there

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::check::CheckResult;
use crate::observability::metrics;

/// Producer half, cloned into every worker.
#[derive(Debug, Clone)]
pub struct ResultSink {
    tx: mpsc::Sender<CheckResult>,
    dropped: Arc<AtomicU64>,
}

/// Consumer half.
#[derive(Debug)]
pub struct ResultStream {
    rx: mpsc::Receiver<CheckResult>,
    dropped: Arc<AtomicU64>,
}

impl ResultSink {
    /// Create a sink holding at most `capacity` undrained results.
    pub fn bounded(capacity: usize) -> (ResultSink, ResultStream) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let dropped = Arc::new(AtomicU64::new(0));
        (
            ResultSink {
                tx,
                dropped: dropped.clone(),
            },
            ResultStream { rx, dropped },
        )
    }

    /// Push without waiting. Returns `false` if the result was dropped.
    pub fn offer(&self, result: CheckResult) -> bool {
        match self.tx.try_send(result) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                metrics::record_result_dropped();
                false
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl ResultStream {
    /// Wait for the next result. `None` once every producer is gone.
    pub async fn recv(&mut self) -> Option<CheckResult> {
        self.rx.recv().await
    }

    /// Take whatever is buffered right now.
    pub fn drain(&mut self) -> Vec<CheckResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.rx.try_recv() {
            results.push(result);
        }
        results
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
