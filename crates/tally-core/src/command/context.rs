use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use tally_model::{Expansions, TaskId};

use crate::client::ApiClient;
use crate::metrics::MetricsHandle;

/// Shared, thread-safe handle to a task's expansion table.
///
/// Commands read placeholder values through it and publish results back
/// into it; clones share the same table. Last write wins, nothing more is
/// promised.
#[derive(Default, Clone)]
pub struct ExpansionSink {
    inner: Arc<Mutex<Expansions>>,
}

impl ExpansionSink {
    pub fn new(expansions: Expansions) -> Self {
        Self {
            inner: Arc::new(Mutex::new(expansions)),
        }
    }

    /// Get the value for a name, if present.
    pub fn get(&self, name: &str) -> Option<String> {
        self.lock().get(name).map(str::to_string)
    }

    /// Insert or overwrite a named value.
    pub fn put(&self, name: impl Into<String>, value: impl Into<String>) {
        self.lock().put(name, value);
    }

    /// Clone the table as it stands right now.
    pub fn snapshot(&self) -> Expansions {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Expansions> {
        // The table is plain data; a poisoned lock cannot leave it torn.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Everything a command needs to run once.
///
/// Carries the task identity, the expansion sink, the network client bound
/// to the counter service, the cooperative stop signal, and a metrics
/// handle. Built with the required pieces and refined with `with_*`
/// setters.
#[derive(Clone)]
pub struct TaskContext {
    task_id: TaskId,
    expansions: ExpansionSink,
    client: Arc<dyn ApiClient>,
    cancel: CancellationToken,
    metrics: MetricsHandle,
}

impl TaskContext {
    /// Create a context with an empty expansion table, a fresh cancellation
    /// token and no-op metrics.
    pub fn new(task_id: TaskId, client: Arc<dyn ApiClient>) -> Self {
        Self {
            task_id,
            expansions: ExpansionSink::default(),
            client,
            cancel: CancellationToken::new(),
            metrics: crate::metrics::noop_metrics(),
        }
    }

    /// Replace the expansion sink and return the updated context.
    pub fn with_expansions(mut self, expansions: ExpansionSink) -> Self {
        self.expansions = expansions;
        self
    }

    /// Replace the cancellation token and return the updated context.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Replace the metrics backend and return the updated context.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn expansions(&self) -> &ExpansionSink {
        &self.expansions
    }

    pub fn client(&self) -> &Arc<dyn ApiClient> {
        &self.client
    }

    pub fn cancel(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }
}

impl fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext")
            .field("task_id", &self.task_id)
            .field("client", &"<client>")
            .field("metrics", &"<handle>")
            .finish()
    }
}

impl fmt::Display for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskContext(task={})", self.task_id)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::client::{ApiResponse, ClientError};

    struct DeadClient;

    #[async_trait]
    impl ApiClient for DeadClient {
        async fn post_json(&self, _: &str, _: &Value) -> Result<ApiResponse, ClientError> {
            Err(ClientError::Unreachable("dead".to_string()))
        }
    }

    fn mk_context() -> TaskContext {
        TaskContext::new(TaskId::from("task-1"), Arc::new(DeadClient))
    }

    #[test]
    fn sink_clones_share_the_table() {
        let sink = ExpansionSink::default();
        let other = sink.clone();

        sink.put("value", "2");

        assert_eq!(other.get("value").as_deref(), Some("2"));
    }

    #[test]
    fn sink_put_overwrites() {
        let sink = ExpansionSink::default();

        sink.put("value", "1");
        sink.put("value", "2");

        assert_eq!(sink.get("value").as_deref(), Some("2"));
    }

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let sink = ExpansionSink::default();
        sink.put("a", "1");

        let snap = sink.snapshot();
        sink.put("b", "2");

        assert_eq!(snap.len(), 1);
        assert!(snap.get("b").is_none());
    }

    #[test]
    fn new_context_starts_with_empty_sink_and_unset_token() {
        let ctx = mk_context();

        assert!(ctx.expansions().snapshot().is_empty());
        assert!(!ctx.cancel().is_cancelled());
    }

    #[test]
    fn with_cancel_replaces_the_token() {
        let token = CancellationToken::new();
        token.cancel();

        let ctx = mk_context().with_cancel(token);

        assert!(ctx.cancel().is_cancelled());
    }

    #[test]
    fn display_names_the_task() {
        let ctx = mk_context();

        assert_eq!(ctx.to_string(), "TaskContext(task=task-1)");
    }
}
