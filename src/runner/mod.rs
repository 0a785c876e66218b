//! Admission-controlled batch dispatch.
//!
//! # Data Flow
//! ```text
//! check_all(targets)
//!     → for each target: acquire a permit (blocks while max_concurrency are in flight)
//!     → spawn task: HealthCheck::check (Checker by default) → release permit
//!                   → StatsAggregator::record
//!                   → ResultSink::offer (drop on full)
//!     → join every task (barrier)
//!
//! On shutdown signal (check_all_until):
//!     stop admitting → wait up to shutdown_grace → abort the rest
//! ```
//!
//! # Design Decisions
//! - The permit is owned by the task, so it is released on return, panic or abort
//! - Completion order is not dispatch order
//! - A failed check is final; nothing is retried
//! - No global deadline; only the per-request timeout bounds a check

pub mod outcome;
pub mod sink;

pub use outcome::BatchOutcome;
pub use sink::{ResultSink, ResultStream};

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::check::{CheckResult, Checker, HealthCheck, Target};
use crate::config::RunnerConfig;
use crate::observability::metrics;
use crate::stats::{StatsAggregator, StatsSnapshot};

/// Error type for runner construction.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
    #[error("max_concurrency must be greater than zero")]
    ZeroConcurrency,
}

/// Dispatches checks under a hard concurrency ceiling.
pub struct Runner {
    checker: Arc<dyn HealthCheck>,
    gate: Arc<Semaphore>,
    stats: Arc<StatsAggregator>,
    sink: Option<ResultSink>,
    max_concurrency: usize,
    shutdown_grace: Duration,
}

impl Runner {
    /// Create a runner with a fresh aggregator and no result sink.
    pub fn new(config: &RunnerConfig) -> Result<Self, RunnerError> {
        if config.max_concurrency == 0 {
            return Err(RunnerError::ZeroConcurrency);
        }

        let checker = Checker::new(config)?;
        Self::with_checker(config, Arc::new(checker))
    }

    /// Create a runner dispatching through `checker` instead of the HTTP
    /// client. The timeout and TLS settings of `config` are not used.
    pub fn with_checker(
        config: &RunnerConfig,
        checker: Arc<dyn HealthCheck>,
    ) -> Result<Self, RunnerError> {
        if config.max_concurrency == 0 {
            return Err(RunnerError::ZeroConcurrency);
        }

        tracing::info!(
            max_concurrency = config.max_concurrency,
            request_timeout_ms = config.request_timeout.as_millis() as u64,
            "Runner created"
        );

        Ok(Self {
            checker,
            gate: Arc::new(Semaphore::new(config.max_concurrency)),
            stats: Arc::new(StatsAggregator::new()),
            sink: None,
            max_concurrency: config.max_concurrency,
            shutdown_grace: config.shutdown_grace,
        })
    }

    /// Attach a result sink. Every completed result is offered to it.
    pub fn with_sink(mut self, sink: ResultSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Check one target outside of any batch.
    pub async fn check(&self, target: Arc<Target>) -> CheckResult {
        self.checker.check(target).await
    }

    /// Check every target and return once all of them have completed.
    pub async fn check_all(&self, targets: Vec<Target>) -> BatchOutcome {
        self.check_all_until(targets, std::future::pending()).await
    }

    /// Like [`Runner::check_all`], but stops admitting work when `shutdown`
    /// resolves. In-flight checks get `shutdown_grace` to finish before they
    /// are aborted.
    pub async fn check_all_until<F>(&self, targets: Vec<Target>, shutdown: F) -> BatchOutcome
    where
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        let mut outcome = BatchOutcome::new(Uuid::new_v4(), targets.len());
        let batch_id = outcome.batch_id;

        tracing::info!(
            %batch_id,
            targets = outcome.targets,
            max_concurrency = self.max_concurrency,
            "Batch starting"
        );

        let mut tasks = JoinSet::new();
        tokio::pin!(shutdown);

        for target in targets {
            let permit = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    outcome.interrupted = true;
                    break;
                }
                permit = self.gate.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => {
                        tracing::error!(%batch_id, "Admission gate closed unexpectedly");
                        break;
                    }
                },
            };

            let checker = self.checker.clone();
            let stats = self.stats.clone();
            let sink = self.sink.clone();
            let gate = self.gate.clone();
            let max_concurrency = self.max_concurrency;
            let target = Arc::new(target);

            tasks.spawn(async move {
                metrics::record_in_flight(max_concurrency - gate.available_permits());
                let result = checker.check(target).await;
                drop(permit);
                metrics::record_in_flight(max_concurrency - gate.available_permits());

                stats.record(&result);
                metrics::record_check(&result);
                if let Some(sink) = sink {
                    sink.offer(result);
                }
            });
            outcome.dispatched += 1;

            // Reap finished tasks so the set stays near max_concurrency.
            while let Some(joined) = tasks.try_join_next() {
                outcome.absorb(joined);
            }
        }

        if !outcome.interrupted {
            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown => {
                        outcome.interrupted = true;
                        break;
                    }
                    joined = tasks.join_next() => match joined {
                        Some(joined) => outcome.absorb(joined),
                        None => break,
                    },
                }
            }
        }

        if outcome.interrupted {
            self.wind_down(&mut tasks, &mut outcome).await;
        }

        outcome.elapsed = started.elapsed();
        metrics::record_in_flight(self.in_flight());

        tracing::info!(
            %batch_id,
            dispatched = outcome.dispatched,
            completed = outcome.completed,
            panicked = outcome.panicked,
            abandoned = outcome.abandoned,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "Batch finished"
        );

        outcome
    }

    async fn wind_down(&self, tasks: &mut JoinSet<()>, outcome: &mut BatchOutcome) {
        tracing::warn!(
            batch_id = %outcome.batch_id,
            in_flight = tasks.len(),
            not_dispatched = outcome.targets - outcome.dispatched,
            grace_ms = self.shutdown_grace.as_millis() as u64,
            "Batch interrupted, waiting for in-flight checks"
        );

        let drained = tokio::time::timeout(self.shutdown_grace, async {
            while let Some(joined) = tasks.join_next().await {
                outcome.absorb(joined);
            }
        })
        .await;

        if drained.is_err() {
            outcome.abandoned = tasks.len();
            tracing::warn!(
                batch_id = %outcome.batch_id,
                abandoned = outcome.abandoned,
                "Grace period elapsed, aborting outstanding checks"
            );
            tasks.shutdown().await;
        }
    }

    /// Copy of the current aggregate. Safe while checks are running.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Shared handle to the aggregator, for the reporter.
    pub fn stats_handle(&self) -> Arc<StatsAggregator> {
        self.stats.clone()
    }

    /// Number of checks currently holding a permit.
    pub fn in_flight(&self) -> usize {
        self.max_concurrency - self.gate.available_permits()
    }
}
