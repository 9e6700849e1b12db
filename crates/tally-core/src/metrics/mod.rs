//! Metrics collection abstraction for command execution.
//!
//! This module provides a backend interface for recording command runs.
//! Metrics backends (prometheus, statsd, etc) implement [`MetricsBackend`]
//! and are injected via [`TaskContext`](crate::command::TaskContext).
mod backend;
pub use backend::{CommandOutcome, MetricsBackend, MetricsHandle};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
