//! Error types shared by collaborator implementations.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by external collaborators (AI, catalog, mailer).
///
/// The dialogue controller never propagates these to the user; each call
/// site substitutes a safe default and logs the error.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Collaborator is misconfigured (missing key, bad URL, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure talking to the collaborator.
    #[error("network error: {0}")]
    Network(String),

    /// The collaborator answered, but not with something usable.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The collaborator did not answer in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Input rejected before calling out.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
