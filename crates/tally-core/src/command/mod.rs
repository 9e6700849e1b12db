//! Command abstraction used by the core layer.
//!
//! Concrete commands implement this trait and are plugged into the
//! [`CommandRegistry`](crate::registry::CommandRegistry); an agent resolves
//! them by name and drives them through [`run_command`].
mod error;
pub use error::CommandError;

mod context;
pub use context::{ExpansionSink, TaskContext};

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::ClientError;
use crate::metrics::CommandOutcome;

/// A single unit of work executed against the counter service.
///
/// A command is constructed from an already-validated configuration and is
/// responsible for:
/// - resolving whatever placeholders its configuration still carries
/// - doing its one job through the context's client
/// - publishing results into the context's expansion sink
#[async_trait]
pub trait Command: Send + Sync {
    /// Command name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Run once. Errors propagate to the caller untouched; nothing here
    /// retries.
    async fn execute(&self, ctx: &TaskContext) -> Result<(), CommandError>;
}

impl std::fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command").field("name", &self.name()).finish()
    }
}

/// Classify a finished run for metrics.
fn command_outcome(res: &Result<(), CommandError>) -> CommandOutcome {
    match res {
        Ok(()) => CommandOutcome::Success,
        Err(CommandError::Canceled) => CommandOutcome::Canceled,
        Err(CommandError::Transport(ClientError::TimedOut(_))) => CommandOutcome::Timeout,
        Err(_) => CommandOutcome::Failure,
    }
}

/// Execute a command with tracing and metrics wrapped around it.
///
/// Records the start, the outcome with its duration, and the error kind on
/// failure. The command's own result passes through unchanged.
pub async fn run_command(cmd: &dyn Command, ctx: &TaskContext) -> Result<(), CommandError> {
    let started = Instant::now();
    ctx.metrics().record_command_started(cmd.name());
    debug!(command = cmd.name(), task = %ctx.task_id(), "command starting");

    let res = cmd.execute(ctx).await;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    let outcome = command_outcome(&res);
    ctx.metrics()
        .record_command_completed(cmd.name(), outcome, elapsed_ms);

    match &res {
        Ok(()) => debug!(command = cmd.name(), elapsed_ms, "command finished"),
        Err(CommandError::Canceled) => warn!(command = cmd.name(), "command canceled"),
        Err(e) => {
            ctx.metrics().record_command_error(cmd.name(), e.kind());
            warn!(command = cmd.name(), error = %e, "command failed");
        }
    }

    res
}
