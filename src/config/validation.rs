//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, concurrency > 0)
//! - Check the base URL and metrics address are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HealthRunnerConfig → Result<(), Vec<ValidationError>>
//! - Runs before any check is attempted

use std::net::SocketAddr;
use url::Url;

use crate::config::schema::HealthRunnerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("runner.max_concurrency must be greater than zero")]
    ZeroConcurrency,
    #[error("runner.request_timeout must be greater than zero")]
    ZeroTimeout,
    #[error("reporter.report_interval must be greater than zero")]
    ZeroReportInterval,
    #[error("targets.base_url `{url}` is not a valid URL: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("targets.base_url must use http or https, got `{0}`")]
    UnsupportedScheme(String),
    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &HealthRunnerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.runner.max_concurrency == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    }
    if config.runner.request_timeout.is_zero() {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.reporter.report_interval.is_zero() {
        errors.push(ValidationError::ZeroReportInterval);
    }

    match Url::parse(&config.targets.base_url) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            url: config.targets.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
