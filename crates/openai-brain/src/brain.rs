//! OpenAiBrain implementation.

use chat_core::{async_trait, ChatError, ProductRef, ResponseGenerator, Turn};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::OpenAiBrainConfig;

/// A [`ResponseGenerator`] backed by an OpenAI-compatible chat-completions API.
pub struct OpenAiBrain {
    client: Client,
    config: OpenAiBrainConfig,
}

impl OpenAiBrain {
    /// Create a new OpenAiBrain with the given configuration.
    pub fn new(config: OpenAiBrainConfig) -> Result<Self, ChatError> {
        if config.api_key.is_empty() {
            return Err(ChatError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder().build().map_err(|e| {
            ChatError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!(
            "OpenAiBrain initialized with model: {}, history turns: {}",
            config.model, config.max_history_turns
        );

        Ok(Self { client, config })
    }

    /// Create an OpenAiBrain from environment variables.
    ///
    /// See [`OpenAiBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, ChatError> {
        Self::new(OpenAiBrainConfig::from_env()?)
    }

    pub fn config(&self) -> &OpenAiBrainConfig {
        &self.config
    }

    /// Build the messages array for a chat completion request.
    fn build_messages(
        &self,
        user_text: &str,
        products: &[ProductRef],
        history: &[Turn],
    ) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(self.config.system_prompt.clone())];

        if !products.is_empty() {
            messages.push(ChatMessage::system(product_context(products)));
        }

        let start = history.len().saturating_sub(self.config.max_history_turns);
        for turn in &history[start..] {
            messages.push(ChatMessage::with_role(turn.role.as_str(), turn.text.clone()));
        }

        messages.push(ChatMessage::user(user_text));
        messages
    }

    /// Make a chat completion request.
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatCompletionResponse, ChatError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending chat completion with {} messages", request.messages.len());

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            let detail = serde_json::from_str::<ApiError>(&error_text)
                .map(|api_error| api_error.error.message)
                .unwrap_or(error_text);

            return Err(ChatError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                detail
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ChatError::ProcessingFailed(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl ResponseGenerator for OpenAiBrain {
    async fn generate(
        &self,
        user_text: &str,
        products: &[ProductRef],
        history: &[Turn],
    ) -> Result<String, ChatError> {
        let messages = self.build_messages(user_text, products, history);
        let completion = self.chat_completion(messages).await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let choice = completion.choices.into_iter().next();
        if let Some(reason) = choice.as_ref().and_then(|c| c.finish_reason.as_deref()) {
            if reason != "stop" {
                warn!("Completion finished with reason: {}", reason);
            }
        }

        choice
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ChatError::ProcessingFailed("No content in response".to_string()))
    }

    fn name(&self) -> &str {
        "OpenAiBrain"
    }
}

/// Render catalog results as a system message.
fn product_context(products: &[ProductRef]) -> String {
    let mut context = String::from("Productos del catálogo relevantes para esta consulta:\n");
    for product in products {
        context.push_str("- ");
        context.push_str(&product.summary_line());
        if let Some(url) = &product.url {
            context.push(' ');
            context.push_str(url);
        }
        context.push('\n');
    }
    context
}
