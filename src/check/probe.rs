//! HTTP probe.
//!
//! # Responsibilities
//! - Own the HTTP client (timeout, TLS policy, no pooling)
//! - Issue one GET per target and classify the outcome
//! - Measure per-check latency

use reqwest::header::{HeaderValue, CONNECTION};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use crate::check::result::{CheckError, CheckResult};
use crate::check::target::Target;
use crate::config::{RunnerConfig, TlsVerification};

/// Upper bound on body bytes read before a response is dropped.
const MAX_DRAIN_BYTES: usize = 1024;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Turns a target into a result. The Runner dispatches through this trait;
/// [`Checker`] is the HTTP implementation.
pub trait HealthCheck: Send + Sync {
    fn check(&self, target: Arc<Target>) -> BoxFuture<'_, CheckResult>;
}

/// Issues individual health probes.
#[derive(Debug, Clone)]
pub struct Checker {
    client: Client,
    timeout: Duration,
}

impl Checker {
    /// Build the HTTP client. This is the only fatal step of a run.
    pub fn new(config: &RunnerConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(0)
            .redirect(Policy::none())
            .no_proxy();

        if config.tls_verification == TlsVerification::AcceptInvalidCerts {
            tracing::warn!("TLS certificate verification is DISABLED; any certificate will be accepted");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build()?;

        tracing::debug!(
            timeout_ms = config.request_timeout.as_millis() as u64,
            tls = ?config.tls_verification,
            user_agent = %config.user_agent,
            "HTTP client ready"
        );

        Ok(Self {
            client,
            timeout: config.request_timeout,
        })
    }

    /// Probe a single target. Never fails: transport faults end up in the
    /// returned result.
    pub async fn check(&self, target: Arc<Target>) -> CheckResult {
        let timestamp = SystemTime::now();
        let start = Instant::now();

        let response = self
            .client
            .get(target.destination().clone())
            .header(CONNECTION, HeaderValue::from_static("close"))
            .send()
            .await;

        match response {
            Ok(response) => {
                let latency = start.elapsed();
                let status = response.status().as_u16();
                drain(response).await;

                tracing::trace!(
                    target_id = %target.id(),
                    status,
                    latency_ms = latency.as_millis() as u64,
                    "Check completed"
                );

                CheckResult::from_status(target, status, latency, timestamp)
            }
            Err(e) => {
                let latency = start.elapsed();
                let error = CheckError::from_reqwest(&e, self.timeout);

                tracing::debug!(
                    target_id = %target.id(),
                    url = %target.destination(),
                    kind = error.kind(),
                    error = %error,
                    latency_ms = latency.as_millis() as u64,
                    "Check failed: no response"
                );

                CheckResult::from_error(target, error, latency, timestamp)
            }
        }
    }
}

impl HealthCheck for Checker {
    fn check(&self, target: Arc<Target>) -> BoxFuture<'_, CheckResult> {
        Box::pin(Checker::check(self, target))
    }
}

/// Read at most `MAX_DRAIN_BYTES` of the body and drop the rest.
async fn drain(mut response: Response) {
    let mut read = 0;
    while read < MAX_DRAIN_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => read += chunk.len(),
            _ => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_either_tls_policy() {
        let mut config = RunnerConfig::default();
        assert!(Checker::new(&config).is_ok());

        config.tls_verification = TlsVerification::AcceptInvalidCerts;
        assert!(Checker::new(&config).is_ok());
    }

    #[test]
    fn test_rejects_unusable_user_agent() {
        let config = RunnerConfig {
            user_agent: "bad\nagent".into(),
            ..RunnerConfig::default()
        };
        assert!(Checker::new(&config).is_err());
    }
}
