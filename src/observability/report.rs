//! Structured description of an error for `error` events.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt::Write;

use serde::Serialize;

/// Error type, message and trace text, ready to merge into a log entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// Short type name of the error, e.g. `ValidationError`.
    pub error_type: String,
    /// The error's `Display` output.
    pub error_message: String,
    /// Source chain followed by the stack backtrace, when one was captured.
    pub traceback: String,
}

impl ErrorReport {
    /// Build a report, capturing a backtrace at the call site.
    ///
    /// Whether frames are recorded follows `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`.
    pub fn new<E>(error: &E) -> Self
    where
        E: Error + ?Sized,
    {
        Self::with_backtrace(error, &Backtrace::capture())
    }

    /// Build a report from a backtrace the caller captured earlier,
    /// typically where the error was created.
    pub fn with_backtrace<E>(error: &E, backtrace: &Backtrace) -> Self
    where
        E: Error + ?Sized,
    {
        let error_type = short_type_name(std::any::type_name::<E>());
        let error_message = error.to_string();
        let traceback = render_traceback(&error_type, &error_message, error.source(), backtrace);

        Self {
            error_type,
            error_message,
            traceback,
        }
    }
}

fn render_traceback(
    error_type: &str,
    message: &str,
    mut source: Option<&(dyn Error + 'static)>,
    backtrace: &Backtrace,
) -> String {
    let mut out = format!("{}: {}\n", error_type, message);

    while let Some(cause) = source {
        let _ = writeln!(out, "Caused by: {}", cause);
        source = cause.source();
    }

    if backtrace.status() == BacktraceStatus::Captured {
        let _ = write!(out, "stack backtrace:\n{}", backtrace);
    }

    out
}

/// Reduce a `std::any::type_name` to its last path segment.
///
/// `my_app::errors::Fetch<u8>` becomes `Fetch`; trait objects such as
/// `dyn core::error::Error + Send + Sync` become `Error`.
pub(crate) fn short_type_name(full: &str) -> String {
    let name = full.strip_prefix("dyn ").unwrap_or(full);
    let name = name.split(" + ").next().unwrap_or(name);
    let name = name.split('<').next().unwrap_or(name);
    let name = name.trim_start_matches('&');
    name.rsplit("::").next().unwrap_or(name).to_string()
}
