//! Dialogue controller for the storefront chat engine.
//!
//! This crate turns one inbound user message into the assistant's reply.
//! It is channel-agnostic: the web chat endpoint and the WhatsApp webhook
//! both normalize their input into a [`TurnRequest`] and hand it to the same
//! [`DialogueController`].
//!
//! # Flow
//!
//! ```text
//! TurnRequest
//!      ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │                   DIALOGUE CONTROLLER                    │
//! │                                                          │
//! │  1. Lock the session (same-key turns queue here)         │
//! │         ↓                                                │
//! │  2. Branch on dialogue state                             │
//! │     • AwaitingHumanHandoffTopic → store topic            │
//! │     • AwaitingContactData → extract lead, notify         │
//! │     • Normal → classify intent                           │
//! │         ↓                                                │
//! │  3. Normal path: catalog lookup, AI reply (bounded)      │
//! │         ↓                                                │
//! │  4. Append turns, capture lead once, offer follow-up     │
//! └──────────────────────────────────────────────────────────┘
//!      ↓
//! TurnResponse (+ background LeadNotifier task)
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use chat_core::ConversationStore;
//! use dialogue::{replies, DialogueConfig, DialogueController, LeadNotifier, TurnRequest};
//! use mock_collaborators::{CountingCatalog, RecordingMailer, ScriptedResponder};
//!
//! #[tokio::main]
//! async fn main() {
//!     let controller = DialogueController::new(
//!         Arc::new(ConversationStore::new(Duration::from_secs(3600))),
//!         Arc::new(ScriptedResponder::default()),
//!         Arc::new(CountingCatalog::sample()),
//!         LeadNotifier::new(Arc::new(RecordingMailer::new()), "ventas@tienda.com"),
//!         DialogueConfig::default(),
//!     );
//!
//!     let response = controller.handle_turn(TurnRequest::web("abc", "Hola")).await.unwrap();
//!     assert_eq!(response.reply, replies::GREETING_MENU);
//! }
//! ```

mod controller;
mod error;
mod notifier;
pub mod replies;
mod sender;

pub use controller::{
    DialogueConfig, DialogueController, TurnRequest, TurnResponse, DEFAULT_CONTACT_CHANNEL,
};
pub use error::DialogueError;
pub use notifier::{conversation_summary, LeadNotifier, SUMMARY_TURNS};
pub use sender::LoggingSender;
