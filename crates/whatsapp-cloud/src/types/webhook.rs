//! Inbound webhook payloads.

use serde::{Deserialize, Serialize};

/// `object` value of WhatsApp Business webhooks.
pub const WEBHOOK_OBJECT: &str = "whatsapp_business_account";

/// Top-level body of a webhook POST.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// [`WEBHOOK_OBJECT`] for WhatsApp message and status callbacks.
    #[serde(default)]
    pub object: String,

    #[serde(default)]
    pub entry: Vec<Entry>,
}

impl WebhookPayload {
    /// Every inbound user message in the payload, in delivery order.
    ///
    /// Status callbacks carry no messages and yield nothing.
    pub fn messages(&self) -> impl Iterator<Item = &InboundMessage> {
        self.entry
            .iter()
            .flat_map(|entry| entry.changes.iter())
            .flat_map(|change| change.value.messages.iter())
    }
}

/// One business account entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub changes: Vec<Change>,
}

/// A change notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Change {
    /// "messages" for message and status callbacks.
    #[serde(default)]
    pub field: String,

    #[serde(default)]
    pub value: ChangeValue,
}

/// Contents of a change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messaging_product: Option<String>,

    #[serde(default)]
    pub messages: Vec<InboundMessage>,

    /// Delivery/read receipts for messages we sent.
    #[serde(default)]
    pub statuses: Vec<serde_json::Value>,
}

/// A message sent by a user to the business number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Sender phone number in international format without "+".
    #[serde(default)]
    pub from: String,

    /// Provider message id ("wamid.…"); stable across redeliveries.
    #[serde(default)]
    pub id: String,

    /// Unix timestamp as a string.
    #[serde(default)]
    pub timestamp: Option<String>,

    /// "text", "image", "audio", "sticker", "location", …
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub text: Option<TextBody>,
}

impl InboundMessage {
    /// The message body, if this is a non-empty text message.
    pub fn text_body(&self) -> Option<&str> {
        if self.kind != "text" {
            return None;
        }
        self.text
            .as_ref()
            .map(|t| t.body.trim())
            .filter(|body| !body.is_empty())
    }
}

/// Body of a text message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub body: String,
}
