//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (DEBUG, LOG_SAMPLE_RATE)
//!     → DebugConfig (resolved once, immutable)
//!     → shared via Arc with the logger and sampler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a process restart
//! - All fields have defaults so an empty environment is a valid config
//! - Sample rates are taken as-is; out-of-range values are not clamped

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_from_env, load_from_lookup, ConfigError};
pub use schema::DebugConfig;
