//! Shared helpers for integration tests.

use std::sync::Arc;

use lambda_debug_toolkit::observability::MemorySink;
use lambda_debug_toolkit::{DebugConfig, Debugger};

/// A debugger whose event lines are captured in memory.
pub fn capturing_debugger(debug: bool) -> (Debugger, MemorySink) {
    let sink = MemorySink::new();
    let config = DebugConfig {
        debug,
        ..DebugConfig::default()
    };
    (Debugger::with_sink(config, Arc::new(sink.clone())), sink)
}

/// Event names in emission order.
#[allow(dead_code)]
pub fn event_names(sink: &MemorySink) -> Vec<String> {
    sink.entries()
        .iter()
        .filter_map(|entry| entry["event"].as_str().map(str::to_string))
        .collect()
}
