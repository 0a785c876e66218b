//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::HealthRunnerConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file without validating it.
///
/// The binary applies CLI overrides before validating, so the two steps are
/// kept apart.
pub fn read_config(path: &Path) -> Result<HealthRunnerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: HealthRunnerConfig = toml::from_str(&content)?;
    Ok(config)
}
