//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Application code / handler wrapper:
//!     → logging.rs (EventLogger builds one JSON entry per event)
//!     → report.rs (error type, message and trace text for `error` events)
//!     → sink.rs (one line per entry: stdout, any writer, or memory)
//!
//! Library diagnostics:
//!     → tracing.rs (tracing-subscriber on stderr, never on the event sink)
//! ```
//!
//! # Design Decisions
//! - Event lines are plain JSON objects, one per line, unbuffered
//! - A logging failure never replaces the caller's result or error
//! - Correlation IDs are ordinary payload fields, not span state

pub mod logging;
pub mod report;
pub mod sink;
pub mod tracing;

pub use logging::{EventLogger, LogEntry};
pub use report::ErrorReport;
pub use sink::{LogSink, MemorySink, StdoutSink, WriterSink};
