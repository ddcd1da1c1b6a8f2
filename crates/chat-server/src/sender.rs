//! WhatsApp channel sender.

use chat_core::{async_trait, ChannelSender, DeliveryResult};
use tracing::error;
use whatsapp_cloud::WhatsAppClient;

/// Delivers assistant messages through the WhatsApp Cloud API.
///
/// The session key of a WhatsApp conversation is the customer's phone
/// number, so it doubles as the recipient.
#[derive(Clone)]
pub struct WhatsAppSender {
    client: WhatsAppClient,
}

impl WhatsAppSender {
    pub fn new(client: WhatsAppClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChannelSender for WhatsAppSender {
    async fn deliver(&self, session_key: &str, messages: &[String]) -> DeliveryResult {
        let mut result = DeliveryResult::default();
        for text in messages {
            match self.client.send_text(session_key, text).await {
                Ok(_) => result.delivered += 1,
                Err(e) => {
                    error!(to = %session_key, "WhatsApp send failed: {}", e);
                    result.errors.push(e.to_string());
                }
            }
        }
        result
    }

    fn name(&self) -> &str {
        "whatsapp"
    }
}
