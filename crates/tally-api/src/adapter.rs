use std::sync::Arc;

use async_trait::async_trait;
use tally_model::Counter;
use tally_store::CounterStore;

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// Adapter that bridges a [`CounterStore`] to [`ApiHandler`].
///
/// This is a ready-to-use implementation that directly delegates to the
/// store. The store call is blocking, so it runs on the blocking pool
/// rather than stalling the request executor.
pub struct StoreHandler {
    store: Arc<dyn CounterStore>,
}

impl StoreHandler {
    /// Create a new adapter wrapping the given store.
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ApiHandler for StoreHandler {
    async fn increment_key(&self, key: &str) -> Result<Counter, ApiError> {
        let store = Arc::clone(&self.store);
        let key = key.to_string();

        tokio::task::spawn_blocking(move || store.increment_and_get(&key))
            .await
            .map_err(|e| ApiError::Internal(format!("store call panicked: {e}")))?
            .map_err(ApiError::from)
    }
}
