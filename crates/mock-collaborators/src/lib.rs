//! Mock collaborators for the storefront chat engine.
//!
//! This crate provides in-memory implementations of the `chat-core` traits
//! for tests and local runs:
//! - `ScriptedResponder` - Replies from a script and records every call
//! - `FailingResponder` - Always errors, to exercise the fallback path
//! - `DelayedResponder` - Wraps another responder with artificial delay
//! - `CountingCatalog` / `FailingCatalog` - Product search doubles
//! - `RecordingMailer` / `FailingMailer` - Capture or reject lead emails
//! - `RecordingSender` - Captures outbound channel deliveries
//! - `FlakySender` - Fails the first deliveries, then records
//!
//! For production AI processing, use the `openai-brain` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_collaborators::{ResponseGenerator, ScriptedResponder};
//!
//! #[tokio::main]
//! async fn main() {
//!     let responder = ScriptedResponder::new(["Tenemos el Colchón Espuma."]);
//!     let reply = responder.generate("busco un colchón", &[], &[]).await.unwrap();
//!
//!     assert_eq!(reply, "Tenemos el Colchón Espuma.");
//!     assert_eq!(responder.calls().await.len(), 1);
//! }
//! ```

mod catalog;
mod delayed;
mod mailer;
mod responder;
mod sender;

// Re-export chat-core types for convenience
pub use chat_core::{
    async_trait, ChannelSender, ChatError, DeliveryResult, LeadMailer, ProductRef, ProductSearch,
    ResponseGenerator, StaticCatalog, Turn,
};

pub use catalog::{CountingCatalog, FailingCatalog};
pub use delayed::DelayedResponder;
pub use mailer::{FailingMailer, RecordingMailer, SentMail};
pub use responder::{FailingResponder, GenerateCall, ScriptedResponder};
pub use sender::{FlakySender, RecordingSender};
