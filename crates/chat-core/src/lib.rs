//! Core types and collaborator traits for the storefront chat engine.
//!
//! This crate holds everything the web chat and WhatsApp paths share:
//!
//! - [`Session`] / [`Turn`] / [`LeadData`] - the conversational data model
//! - [`ConversationStore`] - time-bounded session cache with per-key locking
//! - [`ResponseGenerator`], [`ProductSearch`], [`LeadMailer`], [`ChannelSender`] - the external
//!   capabilities the dialogue depends on
//! - [`StaticCatalog`] - an in-memory [`ProductSearch`] backed by a fixed list
//! - [`ChatError`] - error type shared by collaborator implementations
//!
//! # Example
//!
//! ```rust
//! use chat_core::{Channel, ConversationStore, Turn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let store = ConversationStore::default();
//!
//!     store.append(Channel::Web, "abc", Turn::user("Hola")).await;
//!     store.append(Channel::Web, "abc", Turn::assistant("¡Hola! ¿En qué te ayudo?")).await;
//!
//!     let session = store.get(Channel::Web, "abc").await;
//!     assert_eq!(session.turns.len(), 2);
//! }
//! ```

mod catalog;
mod error;
mod session;
mod store;
mod traits;
mod types;

pub use catalog::StaticCatalog;
pub use error::ChatError;
pub use session::{Session, MAX_SEEN_MESSAGE_IDS};
pub use store::{ConversationStore, SessionGuard, DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL};
pub use traits::{ChannelSender, DeliveryResult, LeadMailer, ProductSearch, ResponseGenerator};
pub use types::{
    Channel, DialogueState, Intent, LeadData, ProductRef, RequestType, Role, Turn,
    MAX_PRODUCTS_PER_TURN,
};

// Re-export async_trait for collaborator implementations
pub use async_trait::async_trait;
