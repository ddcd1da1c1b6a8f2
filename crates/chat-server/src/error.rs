//! Error types for the chat HTTP endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors that can reach an HTTP client.
///
/// Anything that goes wrong inside a turn is answered with a scripted
/// apology instead; these only describe requests that never became a turn.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Malformed or incomplete request body.
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => {
                tracing::debug!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for chat handlers.
pub type Result<T> = std::result::Result<T, ServerError>;
