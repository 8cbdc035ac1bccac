//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Environment variable enabling debug-only events.
pub const ENV_DEBUG: &str = "DEBUG";

/// Environment variable holding the default sampling rate.
pub const ENV_LOG_SAMPLE_RATE: &str = "LOG_SAMPLE_RATE";

/// Default sampling rate used when `LOG_SAMPLE_RATE` is unset.
pub const DEFAULT_SAMPLE_RATE: f64 = 0.01;

/// Process-wide debug settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Emit `log_if_debug` events (including the handler's `full_event`).
    pub debug: bool,

    /// Default probability used by `should_log` when no rate is given.
    pub log_sample_rate: f64,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            debug: false,
            log_sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl DebugConfig {
    /// Config with debug events switched on.
    pub fn debug() -> Self {
        Self {
            debug: true,
            ..Self::default()
        }
    }

    pub fn with_sample_rate(mut self, rate: f64) -> Self {
        self.log_sample_rate = rate;
        self
    }
}
