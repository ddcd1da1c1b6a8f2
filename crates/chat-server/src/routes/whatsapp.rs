//! WhatsApp Cloud API webhook.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use tracing::{debug, info, warn};
use whatsapp_cloud::{verify_webhook, VerifyParams, WebhookPayload, WEBHOOK_OBJECT};

use crate::state::AppState;

/// Subscription handshake: echo the challenge iff the token matches.
pub async fn verify(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<String, StatusCode> {
    match verify_webhook(&params, &state.verify_token) {
        Some(challenge) => {
            info!("WhatsApp webhook verified");
            Ok(challenge)
        }
        None => {
            warn!(mode = ?params.mode, "WhatsApp webhook verification rejected");
            Err(StatusCode::FORBIDDEN)
        }
    }
}

/// Inbound messages and status callbacks.
///
/// Always acknowledged with 200 before any processing; Meta retries
/// anything else.
pub async fn receive(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Ignoring malformed WhatsApp webhook: {}", e);
            return StatusCode::OK;
        }
    };

    if payload.object != WEBHOOK_OBJECT {
        debug!(object = %payload.object, "Ignoring webhook for another object");
        return StatusCode::OK;
    }

    let mut queued = 0;
    for message in payload.messages() {
        if message.from.is_empty() {
            debug!(id = %message.id, "Ignoring message without sender");
            continue;
        }
        state.dispatcher.enqueue(message.clone());
        queued += 1;
    }

    if queued == 0 {
        debug!("WhatsApp callback without messages");
    }
    StatusCode::OK
}
