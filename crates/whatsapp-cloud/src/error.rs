//! Error types for whatsapp-cloud.

use thiserror::Error;

/// Errors that can occur when talking to the WhatsApp Cloud API.
#[derive(Debug, Error)]
pub enum WhatsAppError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the Graph API.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Required environment variable is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}
