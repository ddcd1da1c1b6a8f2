//! Configuration for OpenAiBrain.

use chat_core::ChatError;
use std::env;
use std::path::Path;

/// Default system prompt file name.
pub const DEFAULT_PROMPT_FILE: &str = "SYSTEM_PROMPT.md";

/// Prompt used when neither `AI_SYSTEM_PROMPT` nor a prompt file is available.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Sos el asistente de ventas de una tienda online de \
colchones y descanso. Respondé en español rioplatense, de forma breve y amable. Cuando se te \
pasen productos del catálogo, recomendá sólo esos y mencioná su nombre y precio. No inventes \
productos, precios ni políticas. Si el cliente quiere comprar o necesita algo que no podés \
resolver, ofrecele hablar con un asesor.";

/// Configuration for OpenAiBrain.
#[derive(Clone)]
pub struct OpenAiBrainConfig {
    /// Base URL of the OpenAI-compatible API.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// System prompt sent first on every request.
    pub system_prompt: String,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Maximum number of prior turns sent as prompt history.
    pub max_history_turns: usize,
}

impl std::fmt::Debug for OpenAiBrainConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiBrainConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("system_prompt_len", &self.system_prompt.len())
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("max_history_turns", &self.max_history_turns)
            .finish()
    }
}

impl Default for OpenAiBrainConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: Some(500),
            temperature: Some(0.7),
            max_history_turns: 10,
        }
    }
}

impl OpenAiBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `AI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `AI_API_URL` - API URL (default: https://api.openai.com)
    /// - `AI_MODEL` - Model name (default: gpt-4o-mini)
    /// - `AI_SYSTEM_PROMPT` - System prompt (overrides prompt file)
    /// - `AI_PROMPT_FILE` - Path to system prompt file (default: SYSTEM_PROMPT.md)
    /// - `AI_MAX_TOKENS` - Max tokens (default: 500)
    /// - `AI_TEMPERATURE` - Temperature (default: 0.7)
    /// - `AI_MAX_HISTORY_TURNS` - Max history turns (default: 10)
    ///
    /// System prompt priority:
    /// 1. `AI_SYSTEM_PROMPT` env var (if set)
    /// 2. Contents of prompt file (if exists)
    /// 3. [`DEFAULT_SYSTEM_PROMPT`]
    pub fn from_env() -> Result<Self, ChatError> {
        let api_key = env::var("AI_API_KEY")
            .map_err(|_| ChatError::Configuration("AI_API_KEY not set".to_string()))?;

        let defaults = Self::default();

        let api_url = env::var("AI_API_URL").unwrap_or(defaults.api_url);
        let model = env::var("AI_MODEL").unwrap_or(defaults.model);

        let system_prompt = match env::var("AI_SYSTEM_PROMPT") {
            Ok(prompt) => prompt,
            Err(_) => {
                let prompt_file =
                    env::var("AI_PROMPT_FILE").unwrap_or_else(|_| DEFAULT_PROMPT_FILE.to_string());
                load_prompt_file(&prompt_file).unwrap_or(defaults.system_prompt)
            }
        };

        let max_tokens = env::var("AI_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.max_tokens);

        let temperature = env::var("AI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.temperature);

        let max_history_turns = env::var("AI_MAX_HISTORY_TURNS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_history_turns);

        Ok(Self {
            api_url,
            api_key,
            model,
            system_prompt,
            max_tokens,
            temperature,
            max_history_turns,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> OpenAiBrainConfigBuilder {
        OpenAiBrainConfigBuilder::default()
    }

    /// Full chat-completions endpoint URL.
    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

/// Builder for OpenAiBrainConfig.
#[derive(Debug, Default)]
pub struct OpenAiBrainConfigBuilder {
    config: OpenAiBrainConfig,
}

impl OpenAiBrainConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    pub fn max_history_turns(mut self, turns: usize) -> Self {
        self.config.max_history_turns = turns;
        self
    }

    /// Load the system prompt from a file, keeping the current one if the
    /// file is missing or empty.
    pub fn load_prompt_file(mut self, path: impl AsRef<Path>) -> Self {
        if let Some(prompt) = load_prompt_file(path) {
            self.config.system_prompt = prompt;
        }
        self
    }

    pub fn build(self) -> OpenAiBrainConfig {
        self.config
    }
}

/// Load a prompt file, returning None if not found or empty.
fn load_prompt_file(path: impl AsRef<Path>) -> Option<String> {
    let content = std::fs::read_to_string(path.as_ref()).ok()?;
    let trimmed = content.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
