//! Route handlers for the chat server.

pub mod chat;
pub mod health;
pub mod whatsapp;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Web chat widget
        .route("/api/chat", post(chat::chat))
        // WhatsApp Cloud API webhook
        .route(
            "/webhook/whatsapp",
            get(whatsapp::verify).post(whatsapp::receive),
        )
}
