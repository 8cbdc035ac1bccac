//! Debugging helpers for serverless function handlers.
//!
//! - [`observability`]: structured JSON event lines, error reports, sinks
//! - [`sampling`]: probabilistic gate for high-volume log paths
//! - [`timing`]: timing wrappers emitting `function_timing` events
//! - [`correlation`]: correlation ID extraction and propagation
//! - [`handler`]: the request wrapper, sync and as a tower layer
//!
//! Everything hangs off a [`Debugger`] built once from [`DebugConfig`].

pub mod config;
pub mod correlation;
pub mod debugger;
pub mod handler;
pub mod observability;
pub mod sampling;
pub mod timing;

pub use config::DebugConfig;
pub use debugger::Debugger;
pub use handler::{wrap_handler, DebugLayer, Invocation, InvocationContext, LocalContext};
