use chat_core::ChatError;
use thiserror::Error;

/// Errors that can occur when sending lead emails.
#[derive(Debug, Error)]
pub enum MailerError {
    /// Failed to build SMTP transport
    #[error("SMTP transport error: {0}")]
    Transport(String),

    /// Failed to send email
    #[error("Failed to send email: {0}")]
    Send(String),

    /// Failed to build email message
    #[error("Failed to build email: {0}")]
    BuildEmail(String),

    /// Invalid email address
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing required environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

impl From<MailerError> for ChatError {
    fn from(err: MailerError) -> Self {
        match err {
            MailerError::Transport(msg) | MailerError::Send(msg) => ChatError::Network(msg),
            MailerError::Config(msg) | MailerError::MissingEnvVar(msg) => {
                ChatError::Configuration(msg)
            }
            MailerError::BuildEmail(msg) | MailerError::InvalidAddress(msg) => {
                ChatError::InvalidInput(msg)
            }
        }
    }
}
