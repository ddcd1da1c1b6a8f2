//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chat_core::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL};
use dialogue::{DialogueConfig, DEFAULT_CONTACT_CHANNEL};

/// Chat server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address.
    pub addr: SocketAddr,
    /// Idle time after which a session is forgotten.
    pub session_ttl: Duration,
    /// How often the eviction sweep runs.
    pub eviction_interval: Duration,
    /// Maximum tracked sessions before the least recent is dropped.
    pub max_sessions: usize,
    /// Upper bound on one AI call.
    pub ai_timeout: Duration,
    /// Upper bound on one catalog lookup.
    pub product_search_timeout: Duration,
    /// Sales inbox receiving lead emails.
    pub lead_notify_to: String,
    /// Contact line shown when the assistant cannot help.
    pub contact_channel_text: String,
    /// Remote catalog base URL.
    pub catalog_api_url: Option<String>,
    /// Local JSON catalog, used when no remote catalog is configured.
    pub catalog_file: Option<PathBuf>,
    /// Shared secret for the WhatsApp webhook handshake.
    pub whatsapp_verify_token: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `CHAT_ADDR` | Server bind address | `127.0.0.1:8790` |
    /// | `SESSION_TTL_SECS` | Session idle TTL | `3600` |
    /// | `EVICTION_INTERVAL_SECS` | Eviction sweep period, `1..=SESSION_TTL_SECS` | `300` |
    /// | `MAX_SESSIONS` | Session cap | `10000` |
    /// | `AI_TIMEOUT_SECS` | AI call timeout | `20` |
    /// | `PRODUCT_SEARCH_TIMEOUT_SECS` | Catalog timeout | `5` |
    /// | `LEAD_NOTIFY_TO` | Sales inbox | (required) |
    /// | `CONTACT_CHANNEL_TEXT` | Fallback contact line | store contact form |
    /// | `CATALOG_API_URL` | Remote catalog | (none) |
    /// | `CATALOG_FILE` | JSON catalog file | (none) |
    /// | `WHATSAPP_VERIFY_TOKEN` | Webhook secret | (required) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("CHAT_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8790".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let session_ttl = secs_var("SESSION_TTL_SECS", DEFAULT_SESSION_TTL.as_secs())?;
        let eviction_interval = secs_var("EVICTION_INTERVAL_SECS", 300)?;
        if eviction_interval.is_zero() || eviction_interval > session_ttl {
            return Err(ConfigError::EvictionInterval);
        }
        let max_sessions = parsed_var("MAX_SESSIONS", DEFAULT_MAX_SESSIONS)?;
        let ai_timeout = secs_var("AI_TIMEOUT_SECS", 20)?;
        let product_search_timeout = secs_var("PRODUCT_SEARCH_TIMEOUT_SECS", 5)?;

        let lead_notify_to = non_empty_var("LEAD_NOTIFY_TO")
            .ok_or(ConfigError::Missing("LEAD_NOTIFY_TO"))?;
        let whatsapp_verify_token = non_empty_var("WHATSAPP_VERIFY_TOKEN")
            .ok_or(ConfigError::Missing("WHATSAPP_VERIFY_TOKEN"))?;

        let contact_channel_text = non_empty_var("CONTACT_CHANNEL_TEXT")
            .unwrap_or_else(|| DEFAULT_CONTACT_CHANNEL.to_string());

        Ok(Self {
            addr,
            session_ttl,
            eviction_interval,
            max_sessions,
            ai_timeout,
            product_search_timeout,
            lead_notify_to,
            contact_channel_text,
            catalog_api_url: non_empty_var("CATALOG_API_URL"),
            catalog_file: non_empty_var("CATALOG_FILE").map(PathBuf::from),
            whatsapp_verify_token,
        })
    }

    /// Dialogue tunables derived from this configuration.
    pub fn dialogue_config(&self) -> DialogueConfig {
        DialogueConfig {
            ai_timeout: self.ai_timeout,
            product_search_timeout: self.product_search_timeout,
            contact_channel_text: self.contact_channel_text.clone(),
            ..Default::default()
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        None => Ok(default),
    }
}

fn secs_var(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    parsed_var(name, default).map(Duration::from_secs)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid CHAT_ADDR format")]
    InvalidAddr,

    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{0} must be a non-negative integer")]
    Invalid(&'static str),

    #[error("EVICTION_INTERVAL_SECS must be between 1 and SESSION_TTL_SECS")]
    EvictionInterval,
}
