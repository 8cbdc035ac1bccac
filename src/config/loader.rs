//! Configuration loading from the environment and from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{DebugConfig, ENV_DEBUG, ENV_LOG_SAMPLE_RATE};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// `LOG_SAMPLE_RATE` is not a float.
    #[error("Invalid LOG_SAMPLE_RATE value {value:?}: {source}")]
    InvalidSampleRate {
        value: String,
        source: std::num::ParseFloatError,
    },
}

/// Resolve configuration from the process environment.
pub fn load_from_env() -> Result<DebugConfig, ConfigError> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Resolve configuration from an arbitrary variable lookup.
///
/// Unset variables keep their defaults. `DEBUG` is true only when it equals
/// `"true"` ignoring case.
pub fn load_from_lookup<F>(lookup: F) -> Result<DebugConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_overrides(DebugConfig::default(), lookup)
}

/// Load configuration from a TOML file, then apply environment overrides.
pub fn load_config(path: &Path) -> Result<DebugConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: DebugConfig = toml::from_str(&content)?;

    apply_overrides(config, |key| std::env::var(key).ok())
}

fn apply_overrides<F>(mut config: DebugConfig, lookup: F) -> Result<DebugConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_DEBUG) {
        config.debug = value.eq_ignore_ascii_case("true");
    }

    if let Some(value) = lookup(ENV_LOG_SAMPLE_RATE) {
        config.log_sample_rate = value
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidSampleRate { value, source })?;
    }

    tracing::debug!(
        debug = config.debug,
        log_sample_rate = config.log_sample_rate,
        "Debug configuration resolved"
    );

    Ok(config)
}
