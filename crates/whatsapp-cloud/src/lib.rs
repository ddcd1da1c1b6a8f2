//! WhatsApp Business Cloud API client library.
//!
//! This crate provides a Rust client for the parts of the Cloud API a chat
//! bot needs:
//!
//! - Sending text messages to a customer's phone number
//! - Typed webhook payloads for inbound messages and status callbacks
//! - The webhook subscription handshake
//!
//! # Example
//!
//! ```no_run
//! use whatsapp_cloud::{WhatsAppClient, WhatsAppConfig, WebhookPayload};
//!
//! # async fn example(raw_webhook: &str) -> Result<(), whatsapp_cloud::WhatsAppError> {
//! let client = WhatsAppClient::new(WhatsAppConfig::new("106540352242922", "EAAG..."))?;
//!
//! let payload: WebhookPayload = serde_json::from_str(raw_webhook)?;
//! for message in payload.messages() {
//!     if let Some(text) = message.text_body() {
//!         client.send_text(&message.from, &format!("Recibimos: {}", text)).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;
pub mod verify;

pub use client::WhatsAppClient;
pub use config::{WhatsAppConfig, DEFAULT_API_URL, DEFAULT_API_VERSION};
pub use error::WhatsAppError;
pub use types::*;
pub use verify::{verify_webhook, VerifyParams};
