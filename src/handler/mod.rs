//! Handler wrapping subsystem.
//!
//! # Data Flow
//! ```text
//! (request, context)
//!     → correlation::get_or_create
//!     → request_start {correlation_id, request_id, function_name}
//!     → full_event {correlation_id, request}        (debug only)
//!     → handler(request, context)
//!         Ok  → request_end {correlation_id, duration_ms, status,
//!                            memory_used_mb, time_remaining_ms}
//!             → headers["X-Correlation-ID"] on object responses
//!         Err → error {.., context: {correlation_id, request_id, duration_ms}}
//!             → original error returned
//! ```
//!
//! `wrapper.rs` runs this around synchronous handlers; `layer.rs` runs it
//! as a tower middleware around async services. Both share [`RequestScope`].

pub mod context;
pub mod layer;
pub mod wrapper;

pub use context::{InvocationContext, LocalContext};
pub use layer::{DebugLayer, DebugService, Invocation};
pub use wrapper::{invoke, wrap_handler, WrappedHandler};

use std::error::Error;
use std::time::Instant;

use serde_json::{json, Value};

use crate::correlation;
use crate::debugger::Debugger;
use crate::timing::{elapsed_ms, Status};

pub const REQUEST_START_EVENT: &str = "request_start";
pub const FULL_EVENT: &str = "full_event";
pub const REQUEST_END_EVENT: &str = "request_end";

/// State carried through one pass of the wrapper.
#[derive(Debug, Clone)]
pub struct RequestScope {
    correlation_id: String,
    start: Instant,
}

impl RequestScope {
    /// Resolve the correlation ID, log the start events, and start the clock.
    pub fn begin<C>(debugger: &Debugger, request: &Value, ctx: &C) -> Self
    where
        C: InvocationContext + ?Sized,
    {
        let correlation_id = correlation::get_or_create(request);

        debugger.log(
            REQUEST_START_EVENT,
            &json!({
                "correlation_id": correlation_id,
                "request_id": ctx.request_id(),
                "function_name": ctx.function_name(),
            }),
        );

        debugger.log_if_debug(
            FULL_EVENT,
            &json!({
                "correlation_id": correlation_id,
                "request": request,
            }),
        );

        Self {
            correlation_id,
            start: Instant::now(),
        }
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Log `request_end` and tag object responses with the correlation ID.
    pub fn succeed<C>(self, debugger: &Debugger, ctx: &C, mut response: Value) -> Value
    where
        C: InvocationContext + ?Sized,
    {
        debugger.log(
            REQUEST_END_EVENT,
            &json!({
                "correlation_id": self.correlation_id,
                "duration_ms": elapsed_ms(self.start),
                "status": Status::Success,
                "memory_used_mb": ctx.memory_limit_mb(),
                "time_remaining_ms": ctx.remaining_time_ms(),
            }),
        );

        if let Value::Object(map) = &mut response {
            correlation::add_to_response(map, &self.correlation_id);
        }

        response
    }

    /// Log the handler's error with request context. The caller returns it.
    pub fn fail<C, E>(self, debugger: &Debugger, ctx: &C, error: &E)
    where
        C: InvocationContext + ?Sized,
        E: Error + ?Sized,
    {
        debugger.log_error(
            error,
            &json!({
                "correlation_id": self.correlation_id,
                "request_id": ctx.request_id(),
                "duration_ms": elapsed_ms(self.start),
            }),
        );
    }
}
