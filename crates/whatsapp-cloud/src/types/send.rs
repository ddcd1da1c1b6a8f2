//! Types for sending messages via the Cloud API.

use serde::{Deserialize, Serialize};

/// Body of a send-message request.
#[derive(Debug, Clone, Serialize)]
pub struct SendTextRequest {
    pub messaging_product: &'static str,
    pub recipient_type: &'static str,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: OutboundText,
}

impl SendTextRequest {
    /// Create a plain text message to a phone number.
    pub fn new(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to: to.into(),
            kind: "text",
            text: OutboundText {
                preview_url: false,
                body: body.into(),
            },
        }
    }
}

/// Text part of an outbound message.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundText {
    pub preview_url: bool,
    pub body: String,
}

/// Successful send response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendResult {
    #[serde(default)]
    pub messages: Vec<SentMessageId>,
}

impl SendResult {
    /// Provider id of the first accepted message.
    pub fn message_id(&self) -> Option<&str> {
        self.messages.first().map(|m| m.id.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentMessageId {
    pub id: String,
}

/// Graph API error envelope.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetails,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetails {
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
}
