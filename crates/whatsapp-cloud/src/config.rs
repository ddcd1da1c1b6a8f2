//! Configuration types for whatsapp-cloud.

use std::env;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::error::WhatsAppError;

/// Default Graph API host.
pub const DEFAULT_API_URL: &str = "https://graph.facebook.com";

/// Default Graph API version.
pub const DEFAULT_API_VERSION: &str = "v21.0";

/// Configuration for sending through the WhatsApp Cloud API.
#[derive(Clone)]
pub struct WhatsAppConfig {
    /// Base URL of the Graph API (e.g., "https://graph.facebook.com").
    pub api_url: String,
    /// Graph API version path segment (e.g., "v21.0").
    pub api_version: String,
    /// Business phone number id messages are sent from.
    pub phone_number_id: String,
    access_token: SecretString,
}

impl WhatsAppConfig {
    /// Create a new configuration against the public Graph API.
    pub fn new(phone_number_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            phone_number_id: phone_number_id.into(),
            access_token: SecretString::from(access_token.into()),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `WHATSAPP_PHONE_NUMBER_ID`
    /// - `WHATSAPP_ACCESS_TOKEN`
    ///
    /// Optional:
    /// - `WHATSAPP_API_URL` - Default: https://graph.facebook.com
    /// - `WHATSAPP_API_VERSION` - Default: v21.0
    pub fn from_env() -> Result<Self, WhatsAppError> {
        let phone_number_id = env::var("WHATSAPP_PHONE_NUMBER_ID")
            .map_err(|_| WhatsAppError::MissingEnvVar("WHATSAPP_PHONE_NUMBER_ID".to_string()))?;
        let access_token = env::var("WHATSAPP_ACCESS_TOKEN")
            .map_err(|_| WhatsAppError::MissingEnvVar("WHATSAPP_ACCESS_TOKEN".to_string()))?;

        let mut config = Self::new(phone_number_id, access_token);
        if let Ok(url) = env::var("WHATSAPP_API_URL") {
            config = config.with_api_url(url);
        }
        if let Ok(version) = env::var("WHATSAPP_API_VERSION") {
            config.api_version = version;
        }
        Ok(config)
    }

    /// Builder method to point at another Graph API host.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the send-message endpoint URL.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/{}/{}/messages",
            self.api_url, self.api_version, self.phone_number_id
        )
    }

    pub(crate) fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

impl fmt::Debug for WhatsAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhatsAppConfig")
            .field("api_url", &self.api_url)
            .field("api_version", &self.api_version)
            .field("phone_number_id", &self.phone_number_id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url() {
        let config = WhatsAppConfig::new("1234567890", "token").with_api_url("http://127.0.0.1:9000/");
        assert_eq!(
            config.messages_url(),
            "http://127.0.0.1:9000/v21.0/1234567890/messages"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = WhatsAppConfig::new("1234567890", "EAAG-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("EAAG-secret"));
        assert!(debug.contains("REDACTED"));
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_whatsapp_vars() {
            for var in [
                "WHATSAPP_PHONE_NUMBER_ID",
                "WHATSAPP_ACCESS_TOKEN",
                "WHATSAPP_API_URL",
                "WHATSAPP_API_VERSION",
            ] {
                std::env::remove_var(var);
            }
        }

        clear_all_whatsapp_vars();
        assert!(matches!(
            WhatsAppConfig::from_env(),
            Err(WhatsAppError::MissingEnvVar(_))
        ));

        std::env::set_var("WHATSAPP_PHONE_NUMBER_ID", "555");
        std::env::set_var("WHATSAPP_ACCESS_TOKEN", "token");
        let config = WhatsAppConfig::from_env().unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.access_token(), "token");

        std::env::set_var("WHATSAPP_API_URL", "http://localhost:8089");
        std::env::set_var("WHATSAPP_API_VERSION", "v19.0");
        let config = WhatsAppConfig::from_env().unwrap();
        assert_eq!(config.messages_url(), "http://localhost:8089/v19.0/555/messages");

        clear_all_whatsapp_vars();
    }
}
