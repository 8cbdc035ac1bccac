//! The toolkit facade: one immutable config, one logger, one sampler.

use std::backtrace::Backtrace;
use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{self, ConfigError, DebugConfig};
use crate::observability::{EventLogger, LogSink, StdoutSink};
use crate::sampling::Sampler;
use crate::timing::{self, Timed};

/// Debugging helpers bound to a resolved [`DebugConfig`].
///
/// Build it once at startup and share it (it is cheap to clone). Every
/// facility reads the same config; nothing changes after construction.
#[derive(Debug, Clone)]
pub struct Debugger {
    config: DebugConfig,
    logger: EventLogger,
    sampler: Sampler,
}

impl Default for Debugger {
    fn default() -> Self {
        Self::new(DebugConfig::default())
    }
}

impl Debugger {
    /// Debugger writing events to stdout.
    pub fn new(config: DebugConfig) -> Self {
        Self::with_sink(config, Arc::new(StdoutSink))
    }

    pub fn with_sink(config: DebugConfig, sink: Arc<dyn LogSink>) -> Self {
        Self {
            logger: EventLogger::new(sink, config.debug),
            sampler: Sampler::new(config.log_sample_rate),
            config,
        }
    }

    /// Resolve `DEBUG` / `LOG_SAMPLE_RATE` and log to stdout.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(config::load_from_env()?))
    }

    pub fn config(&self) -> &DebugConfig {
        &self.config
    }

    pub fn logger(&self) -> &EventLogger {
        &self.logger
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn log<T: Serialize + ?Sized>(&self, event_type: &str, data: &T) {
        self.logger.log(event_type, data);
    }

    pub fn log_if_debug<T: Serialize + ?Sized>(&self, event_type: &str, data: &T) {
        self.logger.log_if_debug(event_type, data);
    }

    pub fn log_error<E, C>(&self, error: &E, context: &C)
    where
        E: Error + ?Sized,
        C: Serialize + ?Sized,
    {
        self.logger.log_error(error, context);
    }

    pub fn log_error_with_backtrace<E, C>(&self, error: &E, backtrace: &Backtrace, context: &C)
    where
        E: Error + ?Sized,
        C: Serialize + ?Sized,
    {
        self.logger.log_error_with_backtrace(error, backtrace, context);
    }

    /// Sampling decision at `custom_rate`, or the configured default.
    pub fn should_log(&self, custom_rate: Option<f64>) -> bool {
        self.sampler.should_log(custom_rate)
    }

    /// Run `f` once and emit a `function_timing` event named `function`.
    pub fn time<T, E, F>(&self, function: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: std::fmt::Display,
    {
        timing::time(&self.logger, function, f)
    }

    /// Run an infallible `f` and emit a `success` timing event.
    pub fn time_value<T, F>(&self, function: &str, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        timing::time_value(&self.logger, function, f)
    }

    /// Await `fut` and emit a `function_timing` event named `function`.
    pub async fn time_async<T, E, Fut>(&self, function: &str, fut: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        timing::time_async(&self.logger, function, fut).await
    }

    /// Wrap `f` so that every call is timed.
    pub fn timeit<F>(&self, function: impl Into<String>, f: F) -> Timed<F> {
        Timed::new(self.logger.clone(), function, f)
    }
}
