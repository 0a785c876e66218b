//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a run.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::duration;

/// Root configuration for a health-check run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HealthRunnerConfig {
    /// Which endpoints to probe.
    pub targets: TargetsConfig,

    /// Dispatcher settings (timeouts, admission control, TLS).
    pub runner: RunnerConfig,

    /// Progress reporting.
    pub reporter: ReporterConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Target generation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Number of targets to generate.
    pub count: usize,

    /// Base URL every target is derived from.
    pub base_url: String,

    /// Path appended to the base URL.
    pub path: String,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            count: 100_000,
            base_url: "http://localhost:8080".to_string(),
            path: "/health".to_string(),
        }
    }
}

/// Whether server certificates are verified.
///
/// `AcceptInvalidCerts` is meant for scanning fleets that serve self-signed
/// certificates. It must be chosen explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TlsVerification {
    #[default]
    Verify,
    AcceptInvalidCerts,
}

/// Runner configuration. Immutable for the lifetime of a Runner.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Upper bound for a single check, connect through response.
    #[serde(with = "duration::as_str")]
    pub request_timeout: Duration,

    /// Maximum number of checks in flight at once.
    pub max_concurrency: usize,

    /// Certificate verification policy.
    pub tls_verification: TlsVerification,

    /// Value of the `User-Agent` header sent with every probe.
    pub user_agent: String,

    /// Capacity of the result sink. Zero disables the sink.
    pub sink_capacity: usize,

    /// How long in-flight checks may run after the batch is interrupted.
    #[serde(with = "duration::as_str")]
    pub shutdown_grace: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            max_concurrency: 1000,
            tls_verification: TlsVerification::Verify,
            user_agent: concat!("health-runner/", env!("CARGO_PKG_VERSION")).to_string(),
            sink_capacity: 1000,
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

/// Progress reporter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Time between progress lines.
    #[serde(with = "duration::as_str")]
    pub report_interval: Duration,

    /// Drain the result sink and log every failed check.
    pub tail_failures: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            report_interval: Duration::from_secs(5),
            tail_failures: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Prometheus exporter address; metrics stay off when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "health_runner=info".to_string(),
            metrics_address: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: HealthRunnerConfig = toml::from_str("").unwrap();
        assert_eq!(config.targets.count, 100_000);
        assert_eq!(config.runner.max_concurrency, 1000);
        assert_eq!(config.runner.request_timeout, Duration::from_secs(5));
        assert_eq!(config.runner.tls_verification, TlsVerification::Verify);
        assert!(config.runner.user_agent.starts_with("health-runner/"));
        assert!(config.observability.metrics_address.is_none());
    }

    #[test]
    fn test_partial_document() {
        let config: HealthRunnerConfig = toml::from_str(
            r#"
            [runner]
            request_timeout = "750ms"
            max_concurrency = 8
            tls_verification = "accept_invalid_certs"

            [reporter]
            report_interval = "1m30s"
            "#,
        )
        .unwrap();

        assert_eq!(config.runner.request_timeout, Duration::from_millis(750));
        assert_eq!(config.runner.max_concurrency, 8);
        assert_eq!(config.runner.tls_verification, TlsVerification::AcceptInvalidCerts);
        assert_eq!(config.runner.sink_capacity, 1000);
        assert_eq!(config.reporter.report_interval, Duration::from_secs(90));
        assert_eq!(config.targets.path, "/health");
    }

    #[test]
    fn test_bad_duration_is_a_parse_error() {
        let parsed: Result<HealthRunnerConfig, _> = toml::from_str(
            r#"
            [runner]
            request_timeout = "soon"
            "#,
        );
        assert!(parsed.is_err());
    }
}
