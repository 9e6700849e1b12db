use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use tally_core::client::{ApiClient, ApiResponse, ClientError};
use tally_model::{TASK_ID_HEADER, TaskId};

use crate::error::ExecError;

/// [`ApiClient`] over HTTP, bound to one service base URL and one task.
///
/// Every request carries the task id in the `x-tally-task-id` header so
/// the service side can correlate calls with the task that made them.
///
/// There is no idempotency key on the wire: a request that times out may
/// still have incremented on the service side. Nothing here retries; a
/// caller that retries an ambiguous timeout accepts the double count.
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    task_id: TaskId,
}

impl HttpApiClient {
    /// Create a client without a request deadline.
    pub fn new(base_url: impl Into<String>, task_id: TaskId) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base(base_url),
            task_id,
        }
    }

    /// Apply a per-request deadline and return the updated client.
    ///
    /// A request that outlives the deadline surfaces as
    /// [`ClientError::TimedOut`].
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ExecError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExecError::ClientBuild(e.to_string()))?;
        Ok(self)
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }
}

fn normalize_base(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}

fn classify(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::TimedOut(e.to_string())
    } else if e.is_connect() {
        ClientError::Unreachable(e.to_string())
    } else {
        ClientError::Transport(e.to_string())
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn post_json(&self, route: &str, body: &Value) -> Result<ApiResponse, ClientError> {
        let url = format!("{}/{}", self.base_url, route);

        let resp = self
            .client
            .post(url)
            .header(TASK_ID_HEADER, self.task_id.as_str())
            .json(body)
            .send()
            .await
            .map_err(classify)?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(classify)?;

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

impl fmt::Debug for HttpApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpApiClient")
            .field("base_url", &self.base_url)
            .field("task_id", &self.task_id)
            .finish()
    }
}
