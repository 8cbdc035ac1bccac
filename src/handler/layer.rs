//! Tower middleware applying the debug wrapper to async handlers.
//!
//! ```ignore
//! let service = ServiceBuilder::new()
//!     .layer(DebugLayer::new(debugger))
//!     .service(service_fn(handler));
//! ```

use std::error::Error;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use serde_json::Value;
use tower::{Layer, Service};

use crate::debugger::Debugger;
use crate::handler::context::InvocationContext;
use crate::handler::RequestScope;

/// An inbound request paired with its invocation context.
#[derive(Debug, Clone)]
pub struct Invocation<C> {
    pub payload: Value,
    pub context: C,
}

impl<C> Invocation<C> {
    pub fn new(payload: Value, context: C) -> Self {
        Self { payload, context }
    }
}

/// Layer adding correlation, timing and error logging to a service.
///
/// The inner service's error must implement `std::error::Error`; see
/// [`wrap_handler`](crate::handler::wrap_handler) for wrapping boxed errors.
#[derive(Debug, Clone, Default)]
pub struct DebugLayer {
    debugger: Debugger,
}

impl DebugLayer {
    pub fn new(debugger: Debugger) -> Self {
        Self { debugger }
    }
}

impl<S> Layer<S> for DebugLayer {
    type Service = DebugService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DebugService {
            inner,
            debugger: self.debugger.clone(),
        }
    }
}

/// Service produced by [`DebugLayer`].
#[derive(Debug, Clone)]
pub struct DebugService<S> {
    inner: S,
    debugger: Debugger,
}

impl<S, C> Service<Invocation<C>> for DebugService<S>
where
    S: Service<Invocation<C>, Response = Value>,
    S::Error: Error + Send + 'static,
    S::Future: Send + 'static,
    C: InvocationContext + Clone + Send + 'static,
{
    type Response = Value;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Value, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, invocation: Invocation<C>) -> Self::Future {
        let scope = RequestScope::begin(&self.debugger, &invocation.payload, &invocation.context);
        let ctx = invocation.context.clone();
        let debugger = self.debugger.clone();
        let fut = self.inner.call(invocation);

        Box::pin(async move {
            match fut.await {
                Ok(response) => Ok(scope.succeed(&debugger, &ctx, response)),
                Err(e) => {
                    scope.fail(&debugger, &ctx, &e);
                    Err(e)
                }
            }
        })
    }
}
