//! Invocation context supplied by the hosting platform.

use std::sync::Arc;
use std::time::{Duration, Instant};

/// What the handler wrapper reads from the platform's invocation context.
pub trait InvocationContext {
    /// Platform-assigned ID of this invocation.
    fn request_id(&self) -> &str;

    /// Name of the deployed function.
    fn function_name(&self) -> &str;

    /// Configured memory limit in megabytes.
    fn memory_limit_mb(&self) -> u64;

    /// Milliseconds left before the platform stops the invocation.
    fn remaining_time_ms(&self) -> u64;
}

impl<T: InvocationContext + ?Sized> InvocationContext for &T {
    fn request_id(&self) -> &str {
        (**self).request_id()
    }

    fn function_name(&self) -> &str {
        (**self).function_name()
    }

    fn memory_limit_mb(&self) -> u64 {
        (**self).memory_limit_mb()
    }

    fn remaining_time_ms(&self) -> u64 {
        (**self).remaining_time_ms()
    }
}

impl<T: InvocationContext + ?Sized> InvocationContext for Arc<T> {
    fn request_id(&self) -> &str {
        (**self).request_id()
    }

    fn function_name(&self) -> &str {
        (**self).function_name()
    }

    fn memory_limit_mb(&self) -> u64 {
        (**self).memory_limit_mb()
    }

    fn remaining_time_ms(&self) -> u64 {
        (**self).remaining_time_ms()
    }
}

/// Context for running handlers outside the platform.
///
/// Remaining time counts down from the timeout given at construction.
#[derive(Debug, Clone)]
pub struct LocalContext {
    pub request_id: String,
    pub function_name: String,
    pub memory_limit_mb: u64,
    deadline: Instant,
}

impl LocalContext {
    pub const DEFAULT_REQUEST_ID: &'static str = "local-test";
    pub const DEFAULT_FUNCTION_NAME: &'static str = "test-function";
    pub const DEFAULT_MEMORY_LIMIT_MB: u64 = 128;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

    pub fn new(
        request_id: impl Into<String>,
        function_name: impl Into<String>,
        memory_limit_mb: u64,
        timeout: Duration,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            function_name: function_name.into(),
            memory_limit_mb,
            deadline: Instant::now() + timeout,
        }
    }
}

impl Default for LocalContext {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_REQUEST_ID,
            Self::DEFAULT_FUNCTION_NAME,
            Self::DEFAULT_MEMORY_LIMIT_MB,
            Self::DEFAULT_TIMEOUT,
        )
    }
}

impl InvocationContext for LocalContext {
    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn function_name(&self) -> &str {
        &self.function_name
    }

    fn memory_limit_mb(&self) -> u64 {
        self.memory_limit_mb
    }

    fn remaining_time_ms(&self) -> u64 {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX)
    }
}
