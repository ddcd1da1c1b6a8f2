//! Collaborator traits.
//!
//! The dialogue controller only talks to the outside world through these.
//! All of them are object-safe and are held as `Arc<dyn Trait>`.

use async_trait::async_trait;

use crate::error::ChatError;
use crate::types::{ProductRef, Turn};

/// External AI capability that phrases the assistant's reply.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Generate a reply to `user_text`.
    ///
    /// # Arguments
    ///
    /// * `user_text` - The current user message.
    /// * `products` - Catalog results to ground the answer on (may be empty).
    /// * `history` - Prior turns of the session, oldest first. Does not
    ///   include the current user message.
    async fn generate(
        &self,
        user_text: &str,
        products: &[ProductRef],
        history: &[Turn],
    ) -> Result<String, ChatError>;

    /// Get a human-readable name for this generator.
    fn name(&self) -> &str;
}

/// Read access to the storefront catalog.
#[async_trait]
pub trait ProductSearch: Send + Sync {
    /// Free-text search, best matches first.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ProductRef>, ChatError>;

    /// Products in a category.
    async fn by_category(&self, category: &str, limit: usize)
        -> Result<Vec<ProductRef>, ChatError>;
}

/// Outbound email used for lead notifications.
#[async_trait]
pub trait LeadMailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), ChatError>;
}

/// Outcome of delivering a batch of outbound messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryResult {
    /// Messages accepted by the transport.
    pub delivered: usize,
    /// One entry per message the transport rejected.
    pub errors: Vec<String>,
}

impl DeliveryResult {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Transport that puts assistant messages in front of the user.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// Deliver `messages` in order to the conversation identified by
    /// `session_key`. Never fails; per-message errors are reported in the
    /// result.
    async fn deliver(&self, session_key: &str, messages: &[String]) -> DeliveryResult;

    /// Short transport name for logs.
    fn name(&self) -> &str;
}
