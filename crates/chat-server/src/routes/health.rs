//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
    /// Sessions currently held in memory.
    pub sessions: usize,
    /// Phones with WhatsApp messages still being processed.
    pub whatsapp_workers: usize,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        sessions: state.controller.store().len().await,
        whatsapp_workers: state.dispatcher.active_workers(),
    })
}
