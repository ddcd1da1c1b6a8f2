//! Error types for dialogue operations.

use thiserror::Error;

/// Errors a turn can end with.
///
/// Collaborator failures never show up here; the controller replaces them
/// with scripted replies. These only describe turns that were not run.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// The message had no text.
    #[error("empty message")]
    EmptyMessage,

    /// Message was intentionally skipped (e.g. a provider redelivery).
    #[error("message skipped: {0}")]
    Skipped(String),
}
