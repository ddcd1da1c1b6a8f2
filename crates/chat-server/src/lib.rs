//! HTTP service for the storefront chat engine.
//!
//! Serves the web chat endpoint and the WhatsApp Cloud API webhook on top
//! of one shared [`DialogueController`](dialogue::DialogueController).
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /health` | Liveness and tracked session count |
//! | `POST /api/chat` | One web chat turn, answered synchronously |
//! | `GET /webhook/whatsapp` | Webhook subscription handshake |
//! | `POST /webhook/whatsapp` | Inbound WhatsApp messages, processed after the ack |

pub mod catalog;
pub mod config;
mod dispatch;
mod error;
pub mod routes;
mod sender;
mod state;
mod turn;

use axum::Router;

pub use catalog::HttpCatalog;
pub use config::{ConfigError, ServerConfig};
pub use dispatch::WhatsAppDispatcher;
pub use error::ServerError;
pub use sender::WhatsAppSender;
pub use state::AppState;

/// Build the full application with state attached.
pub fn app(state: AppState) -> Router {
    routes::router().with_state(state)
}
