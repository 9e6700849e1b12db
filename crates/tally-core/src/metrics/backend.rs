use std::sync::Arc;

/// Command execution outcome for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Command completed successfully.
    Success,
    /// Command failed.
    Failure,
    /// Command canceled.
    Canceled,
    /// Command timed out waiting on the service.
    Timeout,
}

impl CommandOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            CommandOutcome::Success => "success",
            CommandOutcome::Failure => "failure",
            CommandOutcome::Canceled => "canceled",
            CommandOutcome::Timeout => "timeout",
        }
    }
}

/// Backend metrics collection interface.
///
/// This trait abstracts metrics collection across different backends.
/// Implementations are injected via [`TaskContext`](crate::command::TaskContext)
/// and driven by [`run_command`](crate::command::run_command).
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record that a command started executing.
    fn record_command_started(&self, command: &str);

    /// Record command completion with outcome and duration.
    ///
    /// Called exactly once per run, whatever the outcome.
    fn record_command_completed(&self, command: &str, outcome: CommandOutcome, duration_ms: u64);

    /// Record a failed run's error category.
    ///
    /// Called in addition to `record_command_completed` when the run ends
    /// in an error other than cancellation.
    fn record_command_error(&self, command: &str, error_kind: &str);
}

/// Shared handle to a metrics backend.
///
/// Stored in the task context and cloned freely.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
