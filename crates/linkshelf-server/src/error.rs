use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use linkshelf_shared::protocol::ErrorResponse;
use linkshelf_shared::{AuthError, ValidationError};
use linkshelf_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Request that failed to extract (bad JSON, wrong content type,
    /// oversized body, unparsable path parameter).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<AuthError> for ServerError {
    fn from(err: AuthError) -> Self {
        ServerError::Unauthorized(err.to_string())
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ServerError::NotFound("Record not found".into()),
            StoreError::LastAdmin => ServerError::Conflict(StoreError::LastAdmin.to_string()),
            other => ServerError::Store(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            ServerError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            ServerError::Rejected { status, message } => (*status, message.clone()),
            ServerError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}
