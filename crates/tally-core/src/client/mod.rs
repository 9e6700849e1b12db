//! Client seam between commands and the counter service.
//!
//! Commands never talk HTTP directly; they go through [`ApiClient`], which a
//! concrete transport implements and the execution context injects. Tests
//! swap in scripted implementations.
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Transport-level failures raised by an [`ApiClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection could not be established at all.
    #[error("service unreachable: {0}")]
    Unreachable(String),

    /// The request was sent but no reply arrived within the deadline.
    #[error("request timed out: {0}")]
    TimedOut(String),

    /// Any other transport failure (reset, protocol-level I/O, ...).
    #[error("transport error: {0}")]
    Transport(String),
}

/// Raw reply from the service, before any command-level interpretation.
///
/// Status checking and body decoding stay with the caller: the client only
/// moves bytes, so commands can report protocol failures with the original
/// status and body detail.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body rendered lossily as text, for error messages.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Network channel bound to the counter service's base address.
///
/// Implementations carry the base URL and the caller's task identity; the
/// command supplies only the route and the body.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// POST `body` as JSON to `route` (relative to the base address) and
    /// return the raw reply.
    async fn post_json(&self, route: &str, body: &Value) -> Result<ApiResponse, ClientError>;
}
