//! Wire types for the WhatsApp Cloud API.

mod send;
mod webhook;

pub use send::{ApiErrorDetails, ApiErrorResponse, OutboundText, SendResult, SendTextRequest, SentMessageId};
pub use webhook::{Change, ChangeValue, Entry, InboundMessage, TextBody, WebhookPayload, WEBHOOK_OBJECT};
