//! Batch bookkeeping.

use serde::Serialize;
use std::time::Duration;
use tokio::task::JoinError;
use uuid::Uuid;

/// How a batch ended. Counts here describe tasks, not check outcomes; those
/// live in the stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub batch_id: Uuid,
    /// Targets handed to the batch.
    pub targets: usize,
    /// Checks admitted through the gate and spawned.
    pub dispatched: usize,
    /// Checks whose task ran to completion.
    pub completed: usize,
    /// Checks whose task panicked.
    pub panicked: usize,
    /// Checks still running when the grace period ran out.
    pub abandoned: usize,
    /// Whether a shutdown signal cut the batch short.
    pub interrupted: bool,
    #[serde(serialize_with = "crate::report::serialize_millis")]
    pub elapsed: Duration,
}

impl BatchOutcome {
    pub(crate) fn new(batch_id: Uuid, targets: usize) -> Self {
        Self {
            batch_id,
            targets,
            dispatched: 0,
            completed: 0,
            panicked: 0,
            abandoned: 0,
            interrupted: false,
            elapsed: Duration::ZERO,
        }
    }

    pub(crate) fn absorb(&mut self, joined: Result<(), JoinError>) {
        match joined {
            Ok(()) => self.completed += 1,
            Err(e) if e.is_panic() => {
                self.panicked += 1;
                tracing::error!(batch_id = %self.batch_id, error = %e, "Check task panicked");
            }
            Err(_) => {}
        }
    }

    /// True when every target was dispatched and every task finished.
    pub fn is_complete(&self) -> bool {
        !self.interrupted && self.completed == self.targets
    }
}
