//! Check outcomes.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::check::target::Target;

/// Why a probe produced no classifiable response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// No response within the configured request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// TCP connect, DNS resolution or TLS handshake failed.
    #[error("connection failed: {0}")]
    Connect(String),
    /// The request could not be built (bad URL, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Any other transport fault.
    #[error("transport error: {0}")]
    Transport(String),
}

impl CheckError {
    pub(crate) fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            CheckError::Timeout(timeout)
        } else if err.is_connect() {
            CheckError::Connect(describe(err))
        } else if err.is_builder() {
            CheckError::InvalidRequest(describe(err))
        } else {
            CheckError::Transport(describe(err))
        }
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::Timeout(_) => "timeout",
            CheckError::Connect(_) => "connect",
            CheckError::InvalidRequest(_) => "invalid_request",
            CheckError::Transport(_) => "transport",
        }
    }
}

/// Flatten an error and its sources into one line.
fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Success predicate for a received response.
pub fn is_success_status(status: u16) -> bool {
    (200..400).contains(&status)
}

/// Classification of a completed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Response received outside the success range.
    Failure,
    /// No classifiable response. Also counted as a failure.
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
            Outcome::Error => "error",
        }
    }
}

/// Result of one check. Created once, at completion, and never mutated.
#[derive(Debug, Clone)]
pub struct CheckResult {
    target: Arc<Target>,
    success: bool,
    status: Option<u16>,
    latency: Duration,
    error: Option<CheckError>,
    timestamp: SystemTime,
}

impl CheckResult {
    /// A check that received a response with `status`.
    pub fn from_status(target: Arc<Target>, status: u16, latency: Duration, timestamp: SystemTime) -> Self {
        Self {
            target,
            success: is_success_status(status),
            status: Some(status),
            latency,
            error: None,
            timestamp,
        }
    }

    /// A check that never got a response.
    pub fn from_error(target: Arc<Target>, error: CheckError, latency: Duration, timestamp: SystemTime) -> Self {
        Self {
            target,
            success: false,
            status: None,
            latency,
            error: Some(error),
            timestamp,
        }
    }

    pub fn target(&self) -> &Arc<Target> {
        &self.target
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn error(&self) -> Option<&CheckError> {
        self.error.as_ref()
    }

    /// When the check was issued.
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    pub fn outcome(&self) -> Outcome {
        match (self.success, &self.error) {
            (true, _) => Outcome::Success,
            (false, None) => Outcome::Failure,
            (false, Some(_)) => Outcome::Error,
        }
    }
}
