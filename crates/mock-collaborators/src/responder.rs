//! Scripted and failing response generators.

use chat_core::{async_trait, ChatError, ProductRef, ResponseGenerator, Turn};
use tokio::sync::Mutex;

/// Reply used when a [`ScriptedResponder`] has an empty script.
const DEFAULT_REPLY: &str = "Respuesta de prueba.";

/// Arguments of one `generate` call, as seen by a [`ScriptedResponder`].
#[derive(Debug, Clone)]
pub struct GenerateCall {
    pub user_text: String,
    pub products: Vec<ProductRef>,
    pub history: Vec<Turn>,
}

/// A responder that replays a script and records what it was asked.
///
/// Replies are handed out in order; once the script runs out the last
/// entry repeats.
pub struct ScriptedResponder {
    script: Vec<String>,
    calls: Mutex<Vec<GenerateCall>>,
}

impl ScriptedResponder {
    pub fn new<I, S>(script: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: script.into_iter().map(Into::into).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call received so far, oldest first.
    pub async fn calls(&self) -> Vec<GenerateCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl Default for ScriptedResponder {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

#[async_trait]
impl ResponseGenerator for ScriptedResponder {
    async fn generate(
        &self,
        user_text: &str,
        products: &[ProductRef],
        history: &[Turn],
    ) -> Result<String, ChatError> {
        let mut calls = self.calls.lock().await;
        let index = calls.len();
        calls.push(GenerateCall {
            user_text: user_text.to_string(),
            products: products.to_vec(),
            history: history.to_vec(),
        });

        let reply = self
            .script
            .get(index)
            .or_else(|| self.script.last())
            .map(String::as_str)
            .unwrap_or(DEFAULT_REPLY);
        Ok(reply.to_string())
    }

    fn name(&self) -> &str {
        "ScriptedResponder"
    }
}

/// A responder that always fails.
#[derive(Debug, Clone)]
pub struct FailingResponder {
    message: String,
}

impl FailingResponder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingResponder {
    fn default() -> Self {
        Self::new("upstream unavailable")
    }
}

#[async_trait]
impl ResponseGenerator for FailingResponder {
    async fn generate(
        &self,
        _user_text: &str,
        _products: &[ProductRef],
        _history: &[Turn],
    ) -> Result<String, ChatError> {
        Err(ChatError::Network(self.message.clone()))
    }

    fn name(&self) -> &str {
        "FailingResponder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_order_and_repeat() {
        let responder = ScriptedResponder::new(["uno", "dos"]);

        let mut replies = Vec::new();
        for _ in 0..3 {
            replies.push(responder.generate("x", &[], &[]).await.unwrap());
        }
        assert_eq!(replies, vec!["uno", "dos", "dos"]);
    }

    #[tokio::test]
    async fn test_records_calls() {
        let responder = ScriptedResponder::default();
        let products = vec![ProductRef::new("1", "Almohada", 1.0, "almohadas")];
        let history = vec![Turn::user("Hola")];

        let reply = responder.generate("busco almohada", &products, &history).await.unwrap();
        assert_eq!(reply, DEFAULT_REPLY);

        let calls = responder.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user_text, "busco almohada");
        assert_eq!(calls[0].products, products);
        assert_eq!(calls[0].history.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_responder() {
        let responder = FailingResponder::default();
        let err = responder.generate("hola", &[], &[]).await.unwrap_err();
        assert!(matches!(err, ChatError::Network(_)));
        assert_eq!(responder.name(), "FailingResponder");
    }
}
