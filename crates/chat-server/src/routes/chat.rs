//! Web chat endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use dialogue::{replies, DialogueError, TurnRequest, TurnResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Result, ServerError};
use crate::state::AppState;
use crate::turn::{run_guarded, TurnOutcome};

/// Body posted by the chat widget.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Set by the widget's "talk to a person" button.
    #[serde(default)]
    pub handoff: bool,
}

/// Turn response plus the session id the widget should keep using.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub turn: TurnResponse,
}

/// Handle one web chat message.
///
/// The reply is computed on this request's task; if the client goes away the
/// turn is dropped before anything is written to the session.
pub async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Json(body) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    let message = body
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ServerError::BadRequest("message is required".to_string()))?;

    let session_id = body
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| {
            let id = Uuid::new_v4().to_string();
            info!(session_id = %id, "Started web chat session");
            id
        });

    let request = TurnRequest::web(&session_id, message).with_handoff(body.handoff);
    let turn = match run_guarded(&state.controller, request).await {
        TurnOutcome::Reply(turn) => turn,
        TurnOutcome::Rejected(DialogueError::EmptyMessage) => {
            return Err(ServerError::BadRequest("message is required".to_string()));
        }
        TurnOutcome::Rejected(e) => {
            warn!(session_id = %session_id, "Turn rejected: {}", e);
            apology(&state)
        }
        TurnOutcome::Crashed => apology(&state),
    };

    Ok(Json(ChatResponse { session_id, turn }))
}

fn apology(state: &AppState) -> TurnResponse {
    TurnResponse::scripted(replies::apology(
        &state.controller.config().contact_channel_text,
    ))
}
