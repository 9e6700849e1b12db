use async_trait::async_trait;
use tally_model::Counter;

use crate::error::ApiError;

/// Counter service API handler.
///
/// This trait abstracts the backend implementation, allowing users to:
/// - Use the provided `StoreHandler`
/// - Implement custom handlers with additional logic (auth, quotas, etc.)
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Atomically bump the counter for `key` and return the record as it
    /// stands after the increment.
    async fn increment_key(&self, key: &str) -> Result<Counter, ApiError>;
}
