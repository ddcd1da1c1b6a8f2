//! Storefront chat server.
//!
//! Wires the OpenAI-compatible response generator, the SMTP lead mailer, the
//! catalog and the WhatsApp client into one dialogue controller and serves it
//! over HTTP.

use std::sync::Arc;

use chat_core::{ChannelSender, ConversationStore};
use chat_server::{catalog, AppState, ServerConfig, WhatsAppSender};
use dialogue::{DialogueController, LeadNotifier, LoggingSender};
use lead_mailer::{MailerConfig, SmtpMailer};
use openai_brain::OpenAiBrain;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use whatsapp_cloud::WhatsAppClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ServerConfig::from_env()?;
    info!(addr = %config.addr, "Starting chat server");

    // Collaborators
    let generator = Arc::new(OpenAiBrain::from_env()?);
    let mailer = Arc::new(SmtpMailer::new(MailerConfig::from_env()?)?);
    let catalog = catalog::from_config(&config)?;

    let whatsapp_sender: Arc<dyn ChannelSender> = match WhatsAppClient::from_env() {
        Ok(client) => Arc::new(WhatsAppSender::new(client)),
        Err(e) => {
            warn!("WhatsApp replies will only be logged: {}", e);
            Arc::new(LoggingSender)
        }
    };

    // Session store with background eviction
    let store = Arc::new(ConversationStore::with_limits(
        config.session_ttl,
        config.max_sessions,
    ));
    let eviction = store.start_eviction_task(config.eviction_interval);

    let controller = Arc::new(DialogueController::new(
        store,
        generator,
        catalog,
        LeadNotifier::new(mailer, config.lead_notify_to.clone()),
        config.dialogue_config(),
    ));

    let state = AppState::new(controller, whatsapp_sender, config.whatsapp_verify_token.clone());
    let app = chat_server::app(state);

    // Start server
    info!(addr = %config.addr, "Chat server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    eviction.abort();
    info!("Chat server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
