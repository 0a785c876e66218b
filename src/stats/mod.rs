//! Aggregate statistics.
//!
//! # Data Flow
//! ```text
//! worker task finishes a check
//!     → StatsAggregator::record (single mutex, four-field update)
//!
//! Reporter tick / final report
//!     → StatsAggregator::snapshot (same mutex, value copy)
//!     → StatsSnapshot (owned, internally consistent)
//! ```
//!
//! # Design Decisions
//! - One mutex guards all five fields so a snapshot is never torn
//! - The lock is held only for the update or the copy, never across `.await`
//! - No history: only the latest aggregate exists

pub mod aggregator;
pub mod snapshot;

pub use aggregator::StatsAggregator;
pub use snapshot::StatsSnapshot;
