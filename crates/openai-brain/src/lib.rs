//! OpenAI-compatible response generator.
//!
//! [`OpenAiBrain`] implements [`ResponseGenerator`](chat_core::ResponseGenerator)
//! over any `/v1/chat/completions` endpoint. Each request carries:
//!
//! - the storefront system prompt (from env, a prompt file, or the built-in default)
//! - a product context block listing the catalog results for this turn
//! - the most recent turns of the session, capped by `max_history_turns`
//! - the current user message
//!
//! The brain keeps no state of its own; history comes from the conversation
//! store on every call.
//!
//! # Usage
//!
//! ```rust,no_run
//! use chat_core::ResponseGenerator;
//! use openai_brain::OpenAiBrain;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = OpenAiBrain::from_env()?;
//!     let reply = brain.generate("¿Qué colchones tienen?", &[], &[]).await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::OpenAiBrain;
pub use config::{OpenAiBrainConfig, OpenAiBrainConfigBuilder, DEFAULT_PROMPT_FILE, DEFAULT_SYSTEM_PROMPT};

// Re-export chat-core types for convenience
pub use chat_core::{async_trait, ChatError, ProductRef, ResponseGenerator, Turn};
