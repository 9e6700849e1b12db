use std::sync::Arc;

use axum::{Json, Router, body::Bytes, extract::State, response::IntoResponse, routing::post};
use tally_model::INC_ROUTE;

use crate::{error::ApiError, handler::ApiHandler};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - POST /inc - Increment a counter and return its record
    pub fn router(self) -> Router {
        Router::new()
            .route(&format!("/{INC_ROUTE}"), post(increment_key::<H>))
            .with_state(self.handler)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /inc
///
/// The request body is one JSON string value, the counter key. The body is
/// decoded by hand rather than through the `Json` extractor so a malformed
/// body answers in the wire's own error shape (non-200, JSON string).
async fn increment_key<H>(
    State(handler): State<Arc<H>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let key: String = serde_json::from_slice(&body)
        .map_err(|e| ApiError::InvalidRequest(format!("body must be a JSON string key: {e}")))?;

    let counter = handler.increment_key(&key).await?;

    Ok(Json(counter))
}
