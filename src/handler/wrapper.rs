//! Synchronous handler wrapper.

use std::error::Error;

use serde_json::Value;

use crate::debugger::Debugger;
use crate::handler::context::InvocationContext;
use crate::handler::RequestScope;

/// Run `handler` once under the debug wrapper.
///
/// The handler's error is logged and returned as-is; no failure response
/// is produced here.
pub fn invoke<C, E, F>(debugger: &Debugger, request: Value, ctx: &C, handler: F) -> Result<Value, E>
where
    C: InvocationContext + ?Sized,
    E: Error,
    F: FnOnce(Value, &C) -> Result<Value, E>,
{
    let scope = RequestScope::begin(debugger, &request, ctx);

    match handler(request, ctx) {
        Ok(response) => Ok(scope.succeed(debugger, ctx, response)),
        Err(e) => {
            scope.fail(debugger, ctx, &e);
            Err(e)
        }
    }
}

/// A handler bound to a [`Debugger`]; see [`wrap_handler`].
#[derive(Debug, Clone)]
pub struct WrappedHandler<H> {
    debugger: Debugger,
    handler: H,
}

/// Wrap `handler` with timing, correlation and error logging.
///
/// The handler's error type must implement `std::error::Error`, which
/// `Box<dyn Error + Send + Sync>` does not. Wrap boxed errors in a newtype
/// forwarding `Display` and `source`; `error_type` then reports the
/// newtype's name.
///
/// ```ignore
/// #[derive(Debug)]
/// struct HandlerError(Box<dyn Error + Send + Sync>);
///
/// impl fmt::Display for HandlerError {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         fmt::Display::fmt(&self.0, f)
///     }
/// }
///
/// impl Error for HandlerError {
///     fn source(&self) -> Option<&(dyn Error + 'static)> {
///         self.0.source()
///     }
/// }
/// ```
///
/// ```ignore
/// let handler = wrap_handler(debugger, |event, ctx: &LocalContext| {
///     Ok(json!({"statusCode": 200}))
/// });
/// let response = handler.call(json!({"user_id": "123"}), &LocalContext::default())?;
/// ```
pub fn wrap_handler<H>(debugger: Debugger, handler: H) -> WrappedHandler<H> {
    WrappedHandler { debugger, handler }
}

impl<H> WrappedHandler<H> {
    pub fn call<C, E>(&self, request: Value, ctx: &C) -> Result<Value, E>
    where
        C: InvocationContext + ?Sized,
        E: Error,
        H: Fn(Value, &C) -> Result<Value, E>,
    {
        invoke(&self.debugger, request, ctx, &self.handler)
    }

    pub fn debugger(&self) -> &Debugger {
        &self.debugger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DebugConfig;
    use crate::handler::{LocalContext, FULL_EVENT, REQUEST_END_EVENT, REQUEST_START_EVENT};
    use crate::observability::MemorySink;
    use serde_json::json;
    use std::sync::Arc;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("user_id is required")]
    struct ValidationError;

    fn debugger(config: DebugConfig) -> (Debugger, MemorySink) {
        let sink = MemorySink::new();
        (Debugger::with_sink(config, Arc::new(sink.clone())), sink)
    }

    #[test]
    fn test_success_sequence() {
        let (debugger, sink) = debugger(DebugConfig::default());
        let ctx = LocalContext::default();

        let response = invoke(&debugger, json!({"correlation_id": "c-1"}), &ctx, |_, _| {
            Ok::<_, ValidationError>(json!({"statusCode": 200}))
        })
        .unwrap();

        assert_eq!(response["statusCode"], 200);
        assert_eq!(response["headers"]["X-Correlation-ID"], "c-1");

        let events: Vec<_> = sink.entries();
        let names: Vec<_> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
        assert_eq!(names, [REQUEST_START_EVENT, REQUEST_END_EVENT]);

        assert_eq!(events[0]["request_id"], "local-test");
        assert_eq!(events[0]["function_name"], "test-function");
        assert_eq!(events[1]["status"], "success");
        assert_eq!(events[1]["memory_used_mb"], 128);
        assert!(events[1]["time_remaining_ms"].as_u64().unwrap() <= 3000);
    }

    #[test]
    fn test_debug_adds_full_event() {
        let (debugger, sink) = debugger(DebugConfig::debug());
        let ctx = LocalContext::default();
        let request = json!({"user_id": "123"});

        let response = invoke(&debugger, request.clone(), &ctx, |_, _| {
            Ok::<_, ValidationError>(json!({"statusCode": 200}))
        })
        .unwrap();

        let full = sink.events(FULL_EVENT);
        assert_eq!(sink.len(), 3);
        assert_eq!(full.len(), 1);
        assert_eq!(full[0]["request"], request);
        assert_eq!(
            full[0]["correlation_id"],
            response["headers"]["X-Correlation-ID"]
        );
    }

    #[test]
    fn test_full_event_keeps_its_tag() {
        let (debugger, sink) = debugger(DebugConfig::debug());
        let request = json!({"event": "user_signup", "correlation_id": "c-2"});

        invoke(&debugger, request.clone(), &LocalContext::default(), |_, _| {
            Ok::<_, ValidationError>(json!({"statusCode": 200}))
        })
        .unwrap();

        let names: Vec<_> = sink
            .entries()
            .iter()
            .map(|e| e["event"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, [REQUEST_START_EVENT, FULL_EVENT, REQUEST_END_EVENT]);

        let full = &sink.events(FULL_EVENT)[0];
        assert_eq!(full["correlation_id"], "c-2");
        assert_eq!(full["request"], request);
    }

    #[test]
    fn test_non_object_response_passes_through() {
        let (debugger, _sink) = debugger(DebugConfig::default());
        let response = invoke(&debugger, json!({}), &LocalContext::default(), |_, _| {
            Ok::<_, ValidationError>(json!("plain text"))
        })
        .unwrap();
        assert_eq!(response, json!("plain text"));
    }

    #[test]
    fn test_error_logged_and_returned() {
        let (debugger, sink) = debugger(DebugConfig::default());
        let ctx = LocalContext::default();

        let err = invoke(&debugger, json!({"correlation_id": "c-9"}), &ctx, |_, _| {
            Err::<Value, _>(ValidationError)
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "user_id is required");

        assert!(sink.events(REQUEST_END_EVENT).is_empty());
        let errors = sink.events("error");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["error_type"], "ValidationError");
        assert_eq!(errors[0]["context"]["correlation_id"], "c-9");
        assert_eq!(errors[0]["context"]["request_id"], "local-test");
        assert!(errors[0]["context"]["duration_ms"].as_f64().unwrap() >= 0.0);
    }

    #[test]
    fn test_wrapped_handler_reusable() {
        let (debugger, sink) = debugger(DebugConfig::default());
        let handler = wrap_handler(debugger, |event: Value, _ctx: &LocalContext| {
            Ok::<_, ValidationError>(json!({"echo": event}))
        });
        let ctx = LocalContext::default();

        handler.call(json!({"n": 1}), &ctx).unwrap();
        let second = handler.call(json!({"n": 2}), &ctx).unwrap();

        assert_eq!(second["echo"]["n"], 2);
        assert_eq!(sink.events(REQUEST_START_EVENT).len(), 2);
    }
}
