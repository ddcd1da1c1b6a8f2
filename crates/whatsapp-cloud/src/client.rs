//! WhatsApp Cloud API HTTP client.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::WhatsAppConfig;
use crate::error::WhatsAppError;
use crate::types::{ApiErrorResponse, SendResult, SendTextRequest};

/// Client for sending messages from a WhatsApp Business number.
#[derive(Clone)]
pub struct WhatsAppClient {
    http: Client,
    config: WhatsAppConfig,
}

impl WhatsAppClient {
    /// Create a new client. No request is made until the first send.
    pub fn new(config: WhatsAppConfig) -> Result<Self, WhatsAppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(WhatsAppError::Http)?;

        Ok(Self { http, config })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, WhatsAppError> {
        Self::new(WhatsAppConfig::from_env()?)
    }

    /// Send a text message to a phone number.
    #[instrument(skip_all, fields(to = %to))]
    pub async fn send_text(&self, to: &str, body: &str) -> Result<SendResult, WhatsAppError> {
        let url = self.config.messages_url();
        debug!("Sending text message ({} chars)", body.chars().count());

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.access_token())
            .json(&SendTextRequest::new(to, body))
            .send()
            .await
            .map_err(WhatsAppError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(WhatsAppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let result: SendResult = response.json().await.map_err(WhatsAppError::Http)?;
        debug!(message_id = ?result.message_id(), "Message accepted");
        Ok(result)
    }

    /// Get the configuration.
    pub fn config(&self) -> &WhatsAppConfig {
        &self.config
    }
}
