//! Application state shared across handlers.

use std::sync::Arc;

use chat_core::ChannelSender;
use dialogue::DialogueController;

use crate::dispatch::WhatsAppDispatcher;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Dialogue controller shared by both channels.
    pub controller: Arc<DialogueController>,
    /// Background WhatsApp processing.
    pub dispatcher: WhatsAppDispatcher,
    /// WhatsApp webhook verification secret.
    pub verify_token: Arc<str>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        controller: Arc<DialogueController>,
        whatsapp_sender: Arc<dyn ChannelSender>,
        verify_token: impl Into<String>,
    ) -> Self {
        let dispatcher = WhatsAppDispatcher::new(Arc::clone(&controller), whatsapp_sender);
        Self {
            controller,
            dispatcher,
            verify_token: Arc::from(verify_token.into()),
        }
    }
}
