use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

use tally_store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request itself is unusable: body is not a JSON string, or the
    /// key is blank. Nothing was mutated.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The store refused the increment; the counter did not advance.
    #[error("storage error: {0}")]
    Storage(String),

    /// Anything that should not happen in normal operation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::EmptyKey => Self::InvalidRequest(e.to_string()),
            StoreError::Backend(msg) => Self::Storage(msg),
        }
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    /// Errors go out as a non-200 status with a JSON string body, the one
    /// error shape the wire contract has.
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        }
        (status, Json(self.to_string())).into_response()
    }
}
