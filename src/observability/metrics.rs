//! Metrics collection and exposition.
//!
//! # Metrics
//! - `health_checks_total` (counter): completed checks by outcome
//! - `health_check_duration_seconds` (histogram): per-check latency
//! - `health_checks_in_flight` (gauge): permits currently held
//! - `health_results_dropped_total` (counter): results the sink dropped

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

use crate::check::CheckResult;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_check(result: &CheckResult) {
    ::metrics::counter!("health_checks_total", "outcome" => result.outcome().as_str()).increment(1);
    ::metrics::histogram!("health_check_duration_seconds").record(result.latency().as_secs_f64());
}

pub fn record_in_flight(in_flight: usize) {
    ::metrics::gauge!("health_checks_in_flight").set(in_flight as f64);
}

pub fn record_result_dropped() {
    ::metrics::counter!("health_results_dropped_total").increment(1);
}
