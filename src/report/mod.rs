//! Final run report.

pub mod summary;

pub use summary::Summary;

use serde::Serializer;
use std::time::Duration;

/// Serialize a duration as fractional milliseconds.
pub fn serialize_millis<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64() * 1000.0)
}

pub(crate) fn serialize_opt_millis<S: Serializer>(
    value: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(d) => serialize_millis(d, serializer),
        None => serializer.serialize_none(),
    }
}
