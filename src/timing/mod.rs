//! Execution timing for arbitrary operations.
//!
//! # Data Flow
//! ```text
//! start = Instant::now()
//!     → run the operation
//!     → Ok(v):  function_timing {function, duration_ms, status: "success"} → Ok(v)
//!     → Err(e): function_timing {function, duration_ms, status: "error", error} → Err(e)
//! ```
//!
//! The operation's value or error is returned exactly as produced; timing
//! only observes it.

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

use serde::Serialize;

use crate::observability::logging::{round_ms, EventLogger};

/// Event type of timing entries.
pub const TIMING_EVENT: &str = "function_timing";

/// Outcome recorded in timing and request events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// One timing measurement, serialized as the event payload.
#[derive(Debug, Clone, Serialize)]
pub struct Timing<'a> {
    pub function: &'a str,
    pub duration_ms: f64,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> Timing<'a> {
    fn observe<T, E: Display>(function: &'a str, start: Instant, result: &Result<T, E>) -> Self {
        let duration_ms = elapsed_ms(start);
        match result {
            Ok(_) => Self {
                function,
                duration_ms,
                status: Status::Success,
                error: None,
            },
            Err(e) => Self {
                function,
                duration_ms,
                status: Status::Error,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Milliseconds since `start`, rounded to two decimals.
pub fn elapsed_ms(start: Instant) -> f64 {
    round_ms(start.elapsed().as_secs_f64() * 1000.0)
}

/// Run `f`, log its timing, and return its result unchanged.
pub fn time<T, E, F>(logger: &EventLogger, function: &str, f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: Display,
{
    let start = Instant::now();
    let result = f();
    logger.log(TIMING_EVENT, &Timing::observe(function, start, &result));
    result
}

/// Run an infallible `f`, log a `success` timing, and return its value.
pub fn time_value<T, F>(logger: &EventLogger, function: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    match time(logger, function, || Ok::<T, Infallible>(f())) {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Await `fut`, log its timing, and return its output unchanged.
pub async fn time_async<T, E, Fut>(logger: &EventLogger, function: &str, fut: Fut) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let start = Instant::now();
    let result = fut.await;
    logger.log(TIMING_EVENT, &Timing::observe(function, start, &result));
    result
}

/// A function wrapped so that each call is timed.
///
/// Functions of several arguments take them as a tuple.
#[derive(Debug, Clone)]
pub struct Timed<F> {
    logger: EventLogger,
    function: String,
    f: F,
}

impl<F> Timed<F> {
    pub fn new(logger: EventLogger, function: impl Into<String>, f: F) -> Self {
        Self {
            logger,
            function: function.into(),
            f,
        }
    }

    /// Name reported in the `function` field.
    pub fn name(&self) -> &str {
        &self.function
    }

    pub fn call<A, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Result<T, E>,
        E: Display,
    {
        time(&self.logger, &self.function, || (self.f)(args))
    }

    pub fn into_inner(self) -> F {
        self.f
    }
}

/// Time a call to a named function, using its identifier as the event name.
///
/// ```ignore
/// let data = time_fn!(debugger, get_user_data(&user_id))?;
/// ```
#[macro_export]
macro_rules! time_fn {
    ($debugger:expr, $func:ident ( $($arg:expr),* $(,)? )) => {
        $debugger.time(stringify!($func), || $func($($arg),*))
    };
}
