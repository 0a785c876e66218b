//! Single-probe checking.
//!
//! # Data Flow
//! ```text
//! Target (id, destination URL)
//!     → probe.rs (GET with User-Agent + Connection: close, bounded by timeout)
//!     → classification: [200, 400) is success, anything else a failure,
//!       no response at all an error
//!     → CheckResult (immutable, handed to stats and the result sink)
//! ```
//!
//! # Design Decisions
//! - Every failure mode is captured in the CheckResult; `check` never fails
//! - Redirects are not followed, so 3xx is classified as returned
//! - No connection reuse between checks

pub mod probe;
pub mod result;
pub mod target;

pub use probe::{BoxFuture, Checker, HealthCheck};
pub use result::{is_success_status, CheckError, CheckResult, Outcome};
pub use target::{generate_targets, Target};
