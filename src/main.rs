//! health-runner
//!
//! Probes `count` copies of `<base-url><path>` with bounded concurrency and
//! prints progress while the batch runs, then a final summary.
//!
//! # Architecture Overview
//!
//! ```text
//!   targets ──▶ Runner ──▶ admission gate (max permits) ──▶ Checker (GET)
//!                 │                                             │
//!                 │            ┌────────────────────────────────┘
//!                 │            ▼
//!                 │     StatsAggregator ◀── Reporter (every interval)
//!                 │            │
//!                 │            └──▶ ResultSink ──▶ failure tail (optional)
//!                 ▼
//!           final snapshot ──▶ Summary (text / JSON)
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use health_runner::check::generate_targets;
use health_runner::config::loader::read_config;
use health_runner::config::validation::validate_config;
use health_runner::config::{parse_duration, ConfigError, HealthRunnerConfig, TlsVerification};
use health_runner::lifecycle::{signals, Shutdown};
use health_runner::observability::{logging, metrics};
use health_runner::report::Summary;
use health_runner::runner::{ResultSink, ResultStream, Runner};
use health_runner::Reporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "health-runner")]
#[command(about = "Bounded-concurrency HTTP health checker", long_about = None)]
struct Cli {
    /// Number of targets to check
    #[arg(long)]
    count: Option<usize>,

    /// Base URL every target points at
    #[arg(long)]
    base_url: Option<String>,

    /// Path appended to the base URL
    #[arg(long)]
    path: Option<String>,

    /// Maximum checks in flight at once
    #[arg(long)]
    max: Option<usize>,

    /// Timeout for each check (e.g. 5s, 500ms, 1m30s)
    #[arg(long, value_parser = parse_duration)]
    timeout: Option<Duration>,

    /// Interval between progress reports
    #[arg(long, value_parser = parse_duration)]
    report_interval: Option<Duration>,

    /// Optional TOML config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Accept any TLS certificate (self-signed fleets)
    #[arg(long)]
    insecure: bool,

    /// Log every failed check
    #[arg(long)]
    tail_failures: bool,

    /// Expose Prometheus metrics on this address
    #[arg(long)]
    metrics_address: Option<String>,

    /// Final report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl Cli {
    fn into_config(self) -> Result<(HealthRunnerConfig, OutputFormat), ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => HealthRunnerConfig::default(),
        };

        if let Some(count) = self.count {
            config.targets.count = count;
        }
        if let Some(base_url) = self.base_url {
            config.targets.base_url = base_url;
        }
        if let Some(path) = self.path {
            config.targets.path = path;
        }
        if let Some(max) = self.max {
            config.runner.max_concurrency = max;
        }
        if let Some(timeout) = self.timeout {
            config.runner.request_timeout = timeout;
        }
        if let Some(interval) = self.report_interval {
            config.reporter.report_interval = interval;
        }
        if self.insecure {
            config.runner.tls_verification = TlsVerification::AcceptInvalidCerts;
        }
        if self.tail_failures {
            config.reporter.tail_failures = true;
        }
        if self.metrics_address.is_some() {
            config.observability.metrics_address = self.metrics_address;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok((config, self.format))
    }
}

/// Log failed results from the sink until every producer is gone.
async fn tail_failures(mut stream: ResultStream) -> u64 {
    while let Some(result) = stream.recv().await {
        if result.is_success() {
            continue;
        }
        tracing::warn!(
            target_id = %result.target().id(),
            url = %result.target().destination(),
            status = ?result.status(),
            error = ?result.error().map(ToString::to_string),
            latency_ms = result.latency().as_millis() as u64,
            "Check failed"
        );
    }
    stream.dropped()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, format) = Cli::parse().into_config()?;

    logging::init(&config.observability.log_filter);

    tracing::info!(
        count = config.targets.count,
        base_url = %config.targets.base_url,
        max_concurrency = config.runner.max_concurrency,
        request_timeout_ms = config.runner.request_timeout.as_millis() as u64,
        report_interval_ms = config.reporter.report_interval.as_millis() as u64,
        "Configuration loaded"
    );

    if let Some(addr) = &config.observability.metrics_address {
        // Validated above.
        metrics::init_metrics(addr.parse()?)?;
    }

    let targets = generate_targets(&config.targets.base_url, &config.targets.path, config.targets.count)?;

    let mut runner = Runner::new(&config.runner)?;
    let mut tail = None;
    if config.reporter.tail_failures && config.runner.sink_capacity > 0 {
        let (sink, stream) = ResultSink::bounded(config.runner.sink_capacity);
        runner = runner.with_sink(sink);
        tail = Some(tokio::spawn(tail_failures(stream)));
    }

    let shutdown = Shutdown::new();
    let reporter = Reporter::new(runner.stats_handle(), config.reporter.report_interval);
    let reporter_handle = tokio::spawn(reporter.run(shutdown.subscribe()));

    let batch_stop = shutdown.notified();
    let signal_handle = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            signals::wait_for_signal().await;
            shutdown.trigger();
        })
    };

    let started = Instant::now();
    let outcome = runner.check_all_until(targets, batch_stop).await;
    let elapsed = started.elapsed();

    signal_handle.abort();
    shutdown.trigger();
    if let Err(e) = reporter_handle.await {
        tracing::error!(error = %e, "Reporter task failed");
    }

    if outcome.interrupted {
        tracing::warn!(
            dispatched = outcome.dispatched,
            abandoned = outcome.abandoned,
            "Run interrupted; summary covers completed checks only"
        );
    }

    let snapshot = runner.stats();
    drop(runner);

    let mut summary = Summary::new(&snapshot, elapsed).with_interrupted(outcome.interrupted);
    if let Some(tail) = tail {
        match tail.await {
            Ok(dropped) => summary = summary.with_dropped_results(dropped),
            Err(e) => tracing::error!(error = %e, "Failure tail task failed"),
        }
    }

    match format {
        OutputFormat::Text => println!("\n{}", summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}
