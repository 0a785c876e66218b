//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides applied by the binary
//!     → validation.rs (semantic checks)
//!     → HealthRunnerConfig (validated, immutable)
//!     → RunnerConfig handed to the Runner, ReporterConfig to the Reporter
//! ```
//!
//! # Design Decisions
//! - Config is immutable once a run starts
//! - All fields have defaults so an empty file (or no file) is valid
//! - Validation separates syntactic (serde) from semantic checks
//! - Durations share one string syntax between the file and the CLI

pub mod duration;
pub mod loader;
pub mod schema;
pub mod validation;

pub use duration::{parse_duration, DurationParseError};
pub use loader::{read_config, ConfigError};
pub use schema::HealthRunnerConfig;
pub use schema::ObservabilityConfig;
pub use schema::ReporterConfig;
pub use schema::RunnerConfig;
pub use schema::TargetsConfig;
pub use schema::TlsVerification;
