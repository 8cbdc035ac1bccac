//! Structured JSON event logging.
//!
//! # Responsibilities
//! - Build a log entry: `{event, timestamp}` merged with caller data
//! - Serialize it as one JSON line and hand it to a sink
//! - Gate debug-only events on the configured debug flag
//! - Describe errors (type, message, trace, context) as `error` events
//!
//! # Design Decisions
//! - Caller keys are merged last and may overwrite `event` / `timestamp`
//! - Data that fails to serialize is replaced by a fallback field
//! - Sink failures are reported via `tracing` and otherwise ignored

use std::backtrace::Backtrace;
use std::error::Error;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::observability::report::ErrorReport;
use crate::observability::sink::{LogSink, StdoutSink};

/// A single log entry before serialization.
pub type LogEntry = Map<String, Value>;

/// Event type used by [`EventLogger::log_error`].
pub const ERROR_EVENT: &str = "error";

/// Field substituted for data that could not be serialized.
pub const UNSERIALIZABLE_FIELD: &str = "unserializable";

/// Writes structured events to a [`LogSink`].
///
/// Cheap to clone; clones share the sink.
#[derive(Clone)]
pub struct EventLogger {
    sink: Arc<dyn LogSink>,
    debug_enabled: bool,
}

impl std::fmt::Debug for EventLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLogger")
            .field("debug_enabled", &self.debug_enabled)
            .finish_non_exhaustive()
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::stdout(false)
    }
}

impl EventLogger {
    pub fn new(sink: Arc<dyn LogSink>, debug_enabled: bool) -> Self {
        Self {
            sink,
            debug_enabled,
        }
    }

    /// Logger writing to standard output.
    pub fn stdout(debug_enabled: bool) -> Self {
        Self::new(Arc::new(StdoutSink), debug_enabled)
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    /// Emit one event line.
    ///
    /// Object payloads are merged into the entry; any other payload is
    /// stored under a `data` key.
    pub fn log<T>(&self, event_type: &str, data: &T)
    where
        T: Serialize + ?Sized,
    {
        let entry = build_entry(event_type, data);
        self.emit(event_type, entry);
    }

    /// Like [`log`](Self::log), but only when debug is enabled.
    pub fn log_if_debug<T>(&self, event_type: &str, data: &T)
    where
        T: Serialize + ?Sized,
    {
        if self.debug_enabled {
            self.log(event_type, data);
        }
    }

    /// Emit an `error` event for `error` with caller context.
    ///
    /// A backtrace is captured here; use
    /// [`log_error_with_backtrace`](Self::log_error_with_backtrace) to pass
    /// one recorded where the error originated. A `()` or `null` context is
    /// logged as `{}`.
    pub fn log_error<E, C>(&self, error: &E, context: &C)
    where
        E: Error + ?Sized,
        C: Serialize + ?Sized,
    {
        self.log_report(ErrorReport::new(error), context);
    }

    pub fn log_error_with_backtrace<E, C>(&self, error: &E, backtrace: &Backtrace, context: &C)
    where
        E: Error + ?Sized,
        C: Serialize + ?Sized,
    {
        self.log_report(ErrorReport::with_backtrace(error, backtrace), context);
    }

    /// Emit an `error` event from a prepared report.
    pub fn log_report<C>(&self, report: ErrorReport, context: &C)
    where
        C: Serialize + ?Sized,
    {
        let context = match to_value_or_fallback(context) {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        self.log(
            ERROR_EVENT,
            &json!({
                "error_type": report.error_type,
                "error_message": report.error_message,
                "traceback": report.traceback,
                "context": context,
            }),
        );
    }

    fn emit(&self, event_type: &str, entry: LogEntry) {
        let line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(
                    event = %event_type,
                    error = %e,
                    "Log entry not serializable, using fallback"
                );
                fallback_line(event_type, &e.to_string())
            }
        };

        if let Err(e) = self.sink.write_line(&line) {
            tracing::warn!(event = %event_type, error = %e, "Failed to write log entry");
        }
    }
}

/// Build `{event, timestamp}` merged with `data`, caller keys last.
pub fn build_entry<T>(event_type: &str, data: &T) -> LogEntry
where
    T: Serialize + ?Sized,
{
    let mut entry = Map::new();
    entry.insert("event".to_string(), Value::from(event_type));
    entry.insert("timestamp".to_string(), Value::from(unix_timestamp()));

    match to_value_or_fallback(data) {
        Value::Object(fields) => entry.extend(fields),
        Value::Null => {}
        other => {
            entry.insert("data".to_string(), other);
        }
    }

    entry
}

/// Seconds since the Unix epoch, with sub-second precision.
pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Milliseconds rounded to two decimal places.
pub fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}

fn to_value_or_fallback<T>(data: &T) -> Value
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(data) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Log data not serializable, using fallback");
            json!({ UNSERIALIZABLE_FIELD: e.to_string() })
        }
    }
}

fn fallback_line(event_type: &str, reason: &str) -> String {
    json!({
        "event": event_type,
        "timestamp": unix_timestamp(),
        UNSERIALIZABLE_FIELD: reason,
    })
    .to_string()
}
