use crate::metrics::backend::{CommandOutcome, MetricsBackend};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_command_started(&self, _: &str) {}

    #[inline(always)]
    fn record_command_completed(&self, _: &str, _: CommandOutcome, _: u64) {}

    #[inline(always)]
    fn record_command_error(&self, _: &str, _: &str) {}
}
