use secrecy::{ExposeSecret, SecretString};
use std::env;

use crate::MailerError;

/// SMTP connection settings for lead emails.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// SMTP host (default: 127.0.0.1)
    pub smtp_host: String,
    /// SMTP port (default: 587)
    pub smtp_port: u16,
    /// Upgrade the connection with STARTTLS (default: true)
    pub starttls: bool,
    /// SMTP login; empty means no authentication
    pub username: String,
    /// Sender address (default: the SMTP username)
    pub from_address: String,
    password: SecretString,
}

impl MailerConfig {
    /// Create a new configuration with explicit values.
    pub fn new(
        smtp_host: impl Into<String>,
        smtp_port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let username = username.into();
        Self {
            smtp_host: smtp_host.into(),
            smtp_port,
            starttls: true,
            from_address: username.clone(),
            username,
            password: SecretString::from(password.into()),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `MAIL_FROM` or `SMTP_USERNAME` - sender address
    ///
    /// Optional (with defaults):
    /// - `SMTP_HOST` - Default: 127.0.0.1
    /// - `SMTP_PORT` - Default: 587
    /// - `SMTP_STARTTLS` - Default: true
    /// - `SMTP_USERNAME` / `SMTP_PASSWORD` - Default: no authentication
    pub fn from_env() -> Result<Self, MailerError> {
        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .map_err(|e| MailerError::Config(format!("Invalid SMTP_PORT: {}", e)))?;

        let starttls = env::var("SMTP_STARTTLS")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        let username = env::var("SMTP_USERNAME").unwrap_or_default();
        let password = env::var("SMTP_PASSWORD").unwrap_or_default();

        let from_address = match env::var("MAIL_FROM") {
            Ok(from) => from,
            Err(_) if !username.is_empty() => username.clone(),
            Err(_) => return Err(MailerError::MissingEnvVar("MAIL_FROM".to_string())),
        };

        Ok(Self {
            smtp_host,
            smtp_port,
            starttls,
            username,
            from_address,
            password: SecretString::from(password),
        })
    }

    /// Get the password (exposes the secret).
    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Builder method to set the sender address.
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from_address = from.into();
        self
    }

    /// Builder method to toggle STARTTLS.
    pub fn with_starttls(mut self, starttls: bool) -> Self {
        self.starttls = starttls;
        self
    }
}
