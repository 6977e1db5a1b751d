use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors a handler can surface to the client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client-supplied data failed a precondition (empty title).
    #[error("{0}")]
    InvalidInput(String),
    /// The store failed during a read or write. The request fails outright;
    /// there is no retry.
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            AppError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}
