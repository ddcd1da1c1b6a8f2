//! Channel sender implementations that need no transport.

use chat_core::{async_trait, ChannelSender, DeliveryResult};

/// A channel sender for debugging that logs every message instead of
/// sending it.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl ChannelSender for LoggingSender {
    async fn deliver(&self, session_key: &str, messages: &[String]) -> DeliveryResult {
        for text in messages {
            tracing::info!("[logging] Sending message to {}: {}", session_key, text);
        }
        DeliveryResult {
            delivered: messages.len(),
            errors: Vec::new(),
        }
    }

    fn name(&self) -> &str {
        "logging"
    }
}
