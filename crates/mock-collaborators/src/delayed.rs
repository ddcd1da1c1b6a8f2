//! Delayed responder - wraps another responder with artificial delay.

use std::time::Duration;

use chat_core::{async_trait, ChatError, ProductRef, ResponseGenerator, Turn};
use tokio::time::sleep;

/// A responder that wraps another responder and adds artificial delay.
///
/// Useful for testing AI timeouts and same-session turn serialization.
pub struct DelayedResponder<R: ResponseGenerator> {
    inner: R,
    delay: Duration,
}

impl<R: ResponseGenerator> DelayedResponder<R> {
    pub fn new(inner: R, delay: Duration) -> Self {
        Self { inner, delay }
    }

    pub fn with_millis(inner: R, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    pub fn with_secs(inner: R, secs: u64) -> Self {
        Self::new(inner, Duration::from_secs(secs))
    }

    /// The wrapped responder.
    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<R: ResponseGenerator> ResponseGenerator for DelayedResponder<R> {
    async fn generate(
        &self,
        user_text: &str,
        products: &[ProductRef],
        history: &[Turn],
    ) -> Result<String, ChatError> {
        sleep(self.delay).await;
        self.inner.generate(user_text, products, history).await
    }

    fn name(&self) -> &str {
        "DelayedResponder"
    }
}
