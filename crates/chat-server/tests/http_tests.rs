//! HTTP-level tests for the chat server.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; all
//! collaborators are in-memory doubles:
//!   cargo test -p chat-server --test http_tests

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chat_core::{
    async_trait, ChannelSender, Channel, ChatError, ConversationStore, ProductRef,
    ResponseGenerator, Role, Turn,
};
use chat_server::AppState;
use dialogue::{replies, DialogueConfig, DialogueController, LeadNotifier};
use mock_collaborators::{
    CountingCatalog, DelayedResponder, FlakySender, RecordingMailer, RecordingSender,
    ScriptedResponder,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const VERIFY_TOKEN: &str = "tienda-verify";
const CONTACT: &str = "ventas@tienda.com";
const PHONE: &str = "5491155551234";

/// A generator that panics mid-turn.
struct PanickingResponder;

#[async_trait]
impl ResponseGenerator for PanickingResponder {
    async fn generate(
        &self,
        _user_text: &str,
        _products: &[ProductRef],
        _history: &[Turn],
    ) -> Result<String, ChatError> {
        panic!("generator exploded");
    }

    fn name(&self) -> &str {
        "PanickingResponder"
    }
}

struct TestApp {
    router: Router,
    controller: Arc<DialogueController>,
    whatsapp: Arc<RecordingSender>,
    mailer: Arc<RecordingMailer>,
}

impl TestApp {
    fn new(generator: Arc<dyn ResponseGenerator>) -> Self {
        let whatsapp = Arc::new(RecordingSender::new());
        let (router, controller, mailer) = build(generator, whatsapp.clone());
        Self {
            router,
            controller,
            whatsapp,
            mailer,
        }
    }

    fn scripted(script: &[&str]) -> Self {
        Self::new(Arc::new(ScriptedResponder::new(script.iter().copied())))
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = self.router.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn chat(&self, body: Value) -> (StatusCode, Value) {
        let (status, body) = self
            .send(
                Request::post("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn webhook(&self, body: impl Into<String>) -> StatusCode {
        post_webhook(&self.router, body.into()).await
    }

    async fn health(&self) -> Value {
        let (status, body) = self
            .send(Request::get("/health").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).unwrap()
    }

    async fn wait_for_whatsapp(&self, n: usize) -> Vec<(String, String)> {
        tokio::time::timeout(Duration::from_secs(5), self.whatsapp.wait_for(n))
            .await
            .expect("WhatsApp replies not delivered in time")
    }
}

/// Router over the sample catalog with the given generator and WhatsApp sender.
fn build(
    generator: Arc<dyn ResponseGenerator>,
    whatsapp: Arc<dyn ChannelSender>,
) -> (Router, Arc<DialogueController>, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::new());
    let controller = Arc::new(DialogueController::new(
        Arc::new(ConversationStore::new(Duration::from_secs(3600))),
        generator,
        Arc::new(CountingCatalog::sample()),
        LeadNotifier::new(mailer.clone(), "ventas@tienda.com"),
        DialogueConfig {
            contact_channel_text: CONTACT.to_string(),
            ..Default::default()
        },
    ));
    let state = AppState::new(controller.clone(), whatsapp, VERIFY_TOKEN);
    (chat_server::app(state), controller, mailer)
}

async fn post_webhook(router: &Router, body: String) -> StatusCode {
    router
        .clone()
        .oneshot(
            Request::post("/webhook/whatsapp")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

fn text_message(from: &str, id: &str, body: &str) -> Value {
    json!({
        "from": from,
        "id": id,
        "timestamp": "1700000000",
        "type": "text",
        "text": { "body": body }
    })
}

fn webhook_body(messages: Vec<Value>) -> String {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "1234567890",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "messages": messages
                }
            }]
        }]
    })
    .to_string()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_reports_sessions() {
    let app = TestApp::scripted(&[]);
    app.chat(json!({ "message": "Hola", "sessionId": "s1" })).await;

    let health = app.health().await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["sessions"], 1);
    assert_eq!(health["whatsapp_workers"], 0);
}

// ============================================================================
// Web chat
// ============================================================================

mod web_chat {
    use super::*;

    #[tokio::test]
    async fn test_greeting_assigns_session_id() {
        let app = TestApp::scripted(&[]);

        let (status, body) = app.chat(json!({ "message": "Hola" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], replies::GREETING_MENU);
        assert_eq!(body["products"], json!([]));
        assert_eq!(body["intentDebug"], "greeting");

        let session_id = body["sessionId"].as_str().unwrap();
        assert!(!session_id.is_empty());
        let session = app.controller.store().get(Channel::Web, session_id).await;
        assert_eq!(session.turns.len(), 2);
    }

    #[tokio::test]
    async fn test_session_id_is_kept() {
        let app = TestApp::scripted(&["Primera", "Segunda"]);

        let (_, first) = app
            .chat(json!({ "message": "tengo una consulta", "sessionId": "web-42" }))
            .await;
        let (_, second) = app
            .chat(json!({ "message": "y otra más", "sessionId": "web-42" }))
            .await;

        assert_eq!(first["sessionId"], "web-42");
        assert_eq!(second["sessionId"], "web-42");
        assert_eq!(second["reply"], "Segunda");
        let session = app.controller.store().get(Channel::Web, "web-42").await;
        assert_eq!(session.turns.len(), 4);
    }

    #[tokio::test]
    async fn test_product_reply_carries_products() {
        let app = TestApp::scripted(&["Te recomiendo el Colchón Espuma 2 plazas."]);

        let (status, body) = app
            .chat(json!({ "message": "busco un colchón para 2 plazas", "sessionId": "s1" }))
            .await;

        assert_eq!(status, StatusCode::OK);
        let products = body["products"].as_array().unwrap();
        assert!(!products.is_empty());
        assert!(products.len() <= 3);
        assert_eq!(products[0]["name"], "Colchón Espuma 2 plazas");
        assert!(body.get("followUp").is_none());
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let app = TestApp::scripted(&[]);

        for body in [json!({ "message": "   " }), json!({ "sessionId": "s1" })] {
            let (status, body) = app.chat(body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "message is required");
        }
        assert_eq!(app.controller.store().len().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_json_rejected() {
        let app = TestApp::scripted(&[]);

        let (status, body) = app
            .send(
                Request::post("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_handoff_flag_starts_handoff() {
        let app = TestApp::scripted(&[]);

        let (status, body) = app
            .chat(json!({ "message": "quiero consultar", "sessionId": "s1", "handoff": true }))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], replies::ASK_HANDOFF_TOPIC);

        app.chat(json!({ "message": "cambiar un sommier", "sessionId": "s1" }))
            .await;
        let (_, last) = app
            .chat(json!({ "message": "Ana, ana@mail.com", "sessionId": "s1" }))
            .await;
        assert_eq!(last["reply"], replies::HANDOFF_CONFIRMATION);

        let mails = tokio::time::timeout(Duration::from_secs(5), app.mailer.wait_for(1))
            .await
            .unwrap();
        assert_eq!(mails.len(), 1);
        assert!(mails[0].html_body.contains("cambiar un sommier"));
    }

    #[tokio::test]
    async fn test_panic_returns_apology() {
        let app = TestApp::new(Arc::new(PanickingResponder));

        let (status, body) = app
            .chat(json!({ "message": "tengo una consulta", "sessionId": "s1" }))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sessionId"], "s1");
        assert_eq!(body["reply"], replies::apology(CONTACT));

        // The session lock was released by the unwind
        let (status, body) = app.chat(json!({ "message": "Hola", "sessionId": "s1" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], replies::GREETING_MENU);
    }
}

// ============================================================================
// WhatsApp webhook
// ============================================================================

mod whatsapp {
    use super::*;

    fn verify_uri(mode: &str, token: &str) -> String {
        format!(
            "/webhook/whatsapp?hub.mode={}&hub.verify_token={}&hub.challenge=1158201444",
            mode, token
        )
    }

    #[tokio::test]
    async fn test_verify_echoes_challenge() {
        let app = TestApp::scripted(&[]);

        let (status, body) = app
            .send(
                Request::get(verify_uri("subscribe", VERIFY_TOKEN))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"1158201444");
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_token() {
        let app = TestApp::scripted(&[]);

        for uri in [
            verify_uri("subscribe", "otro-token"),
            verify_uri("unsubscribe", VERIFY_TOKEN),
            "/webhook/whatsapp".to_string(),
        ] {
            let (status, _) = app
                .send(Request::get(uri.as_str()).body(Body::empty()).unwrap())
                .await;
            assert_eq!(status, StatusCode::FORBIDDEN, "uri: {}", uri);
        }
    }

    #[tokio::test]
    async fn test_text_message_answered() {
        let app = TestApp::scripted(&["Enviamos a todo el país."]);

        let status = app
            .webhook(webhook_body(vec![text_message(
                PHONE,
                "wamid.1",
                "hacen envíos a Rosario?",
            )]))
            .await;
        assert_eq!(status, StatusCode::OK);

        let deliveries = app.wait_for_whatsapp(1).await;
        assert_eq!(
            deliveries,
            vec![(PHONE.to_string(), "Enviamos a todo el país.".to_string())]
        );

        let session = app.controller.store().get(Channel::WhatsApp, PHONE).await;
        assert_eq!(session.turns.len(), 2);
        assert_eq!(session.turns[0].text, "hacen envíos a Rosario?");
    }

    #[tokio::test]
    async fn test_products_listed_in_reply() {
        let app = TestApp::scripted(&["Mirá estas opciones:"]);

        app.webhook(webhook_body(vec![text_message(
            PHONE,
            "wamid.1",
            "busco un colchón para 2 plazas",
        )]))
        .await;

        let deliveries = app.wait_for_whatsapp(1).await;
        assert!(deliveries[0].1.starts_with("Mirá estas opciones:\n\n• "));
        assert!(deliveries[0].1.contains("Colchón Espuma 2 plazas"));
    }

    #[tokio::test]
    async fn test_non_text_gets_text_only_notice() {
        let app = TestApp::scripted(&[]);

        let image = json!({
            "from": PHONE,
            "id": "wamid.img",
            "type": "image",
            "image": { "id": "media-1", "mime_type": "image/jpeg" }
        });
        assert_eq!(app.webhook(webhook_body(vec![image])).await, StatusCode::OK);

        let deliveries = app.wait_for_whatsapp(1).await;
        assert_eq!(deliveries[0].1, replies::TEXT_ONLY);

        // Not a turn
        let session = app.controller.store().get(Channel::WhatsApp, PHONE).await;
        assert!(session.turns.is_empty());
    }

    #[tokio::test]
    async fn test_redelivery_answered_once() {
        let app = TestApp::scripted(&["Primera", "Segunda"]);
        let body = webhook_body(vec![text_message(PHONE, "wamid.dup", "tengo una consulta")]);

        app.webhook(body.clone()).await;
        app.wait_for_whatsapp(1).await;
        app.webhook(body).await;

        // A later distinct message proves the duplicate was dropped, not delayed
        app.webhook(webhook_body(vec![text_message(PHONE, "wamid.2", "otra consulta")]))
            .await;
        let deliveries = app.wait_for_whatsapp(2).await;

        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[1].1, "Segunda");
        let session = app.controller.store().get(Channel::WhatsApp, PHONE).await;
        assert_eq!(session.turns.len(), 4);
    }

    #[tokio::test]
    async fn test_status_callback_acknowledged() {
        let app = TestApp::scripted(&[]);

        let body = json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "1234567890",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "statuses": [{ "id": "wamid.out", "status": "delivered" }]
                    }
                }]
            }]
        });

        assert_eq!(app.webhook(body.to_string()).await, StatusCode::OK);
        assert_eq!(app.controller.store().len().await, 0);
    }

    #[tokio::test]
    async fn test_malformed_body_acknowledged() {
        let app = TestApp::scripted(&[]);

        assert_eq!(app.webhook("esto no es json").await, StatusCode::OK);
        assert_eq!(app.webhook("").await, StatusCode::OK);
        assert_eq!(app.controller.store().len().await, 0);
        assert!(app.whatsapp.deliveries().await.is_empty());
    }

    #[tokio::test]
    async fn test_same_phone_processed_in_order() {
        let generator = Arc::new(DelayedResponder::with_millis(
            ScriptedResponder::new(["Respuesta uno", "Respuesta dos", "Respuesta tres"]),
            50,
        ));
        let app = TestApp::new(generator);

        // One batch, then a second webhook while the first turn is still running
        app.webhook(webhook_body(vec![
            text_message(PHONE, "wamid.1", "mensaje uno"),
            text_message(PHONE, "wamid.2", "mensaje dos"),
        ]))
        .await;
        app.webhook(webhook_body(vec![text_message(PHONE, "wamid.3", "mensaje tres")]))
            .await;

        app.wait_for_whatsapp(3).await;
        assert_eq!(
            app.whatsapp.messages_for(PHONE).await,
            vec!["Respuesta uno", "Respuesta dos", "Respuesta tres"]
        );

        let session = app.controller.store().get(Channel::WhatsApp, PHONE).await;
        let user_turns: Vec<_> = session
            .turns
            .iter()
            .filter(|t| t.role == Role::User)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(user_turns, vec!["mensaje uno", "mensaje dos", "mensaje tres"]);
    }

    #[tokio::test]
    async fn test_phones_are_independent() {
        let app = TestApp::scripted(&["Hola desde la tienda"]);

        app.webhook(webhook_body(vec![
            text_message("5491100000001", "wamid.a", "consulta uno"),
            text_message("5491100000002", "wamid.b", "consulta dos"),
        ]))
        .await;

        let deliveries = app.wait_for_whatsapp(2).await;
        let mut recipients: Vec<_> = deliveries.iter().map(|(to, _)| to.as_str()).collect();
        recipients.sort();
        assert_eq!(recipients, vec!["5491100000001", "5491100000002"]);
        assert_eq!(app.controller.store().len().await, 2);
    }

    #[tokio::test]
    async fn test_panic_sends_apology() {
        let app = TestApp::new(Arc::new(PanickingResponder));

        app.webhook(webhook_body(vec![text_message(
            PHONE,
            "wamid.1",
            "tengo una consulta",
        )]))
        .await;

        let deliveries = app.wait_for_whatsapp(1).await;
        assert_eq!(deliveries[0].1, replies::apology(CONTACT));
    }

    #[tokio::test]
    async fn test_acknowledged_before_turn_finishes() {
        let generator = Arc::new(DelayedResponder::with_secs(
            ScriptedResponder::new(["Respuesta lenta"]),
            30,
        ));
        let app = TestApp::new(generator);

        let status = tokio::time::timeout(
            Duration::from_secs(1),
            app.webhook(webhook_body(vec![text_message(PHONE, "wamid.1", "tengo una consulta")])),
        )
        .await
        .expect("webhook waited for the turn");

        assert_eq!(status, StatusCode::OK);
        assert!(app.whatsapp.deliveries().await.is_empty());
        assert_eq!(app.health().await["whatsapp_workers"], 1);
    }

    #[tokio::test]
    async fn test_worker_exits_when_drained() {
        let app = TestApp::scripted(&["Enviamos a todo el país."]);

        app.webhook(webhook_body(vec![text_message(PHONE, "wamid.1", "hacen envíos?")]))
            .await;
        app.wait_for_whatsapp(1).await;

        tokio::time::timeout(Duration::from_secs(5), async {
            while app.health().await["whatsapp_workers"] != 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("worker still registered");
    }

    #[tokio::test]
    async fn test_failed_send_does_not_stop_worker() {
        let sender = Arc::new(FlakySender::failing_first(1));
        let generator = Arc::new(ScriptedResponder::new(["Primera", "Segunda"]));
        let (router, controller, _) = build(generator, sender.clone());

        let first = webhook_body(vec![text_message(PHONE, "wamid.1", "tengo una consulta")]);
        let second = webhook_body(vec![text_message(PHONE, "wamid.2", "otra consulta")]);
        assert_eq!(post_webhook(&router, first).await, StatusCode::OK);
        assert_eq!(post_webhook(&router, second).await, StatusCode::OK);

        let delivered = tokio::time::timeout(Duration::from_secs(5), sender.recorded().wait_for(1))
            .await
            .expect("second reply not delivered");
        assert_eq!(delivered, vec![(PHONE.to_string(), "Segunda".to_string())]);
        assert_eq!(sender.attempts(), 2);

        // The failed reply is still part of the conversation
        let session = controller.store().get(Channel::WhatsApp, PHONE).await;
        assert_eq!(session.turns.len(), 4);
        assert_eq!(session.turns[1].text, "Primera");
    }

    #[tokio::test]
    async fn test_other_objects_ignored() {
        let app = TestApp::scripted(&[]);

        let body = json!({
            "object": "page",
            "entry": [{
                "id": "1234567890",
                "changes": [{
                    "field": "messages",
                    "value": { "messages": [text_message(PHONE, "wamid.1", "hola")] }
                }]
            }]
        });

        assert_eq!(app.webhook(body.to_string()).await, StatusCode::OK);
        assert_eq!(app.controller.store().len().await, 0);
        assert_eq!(app.health().await["whatsapp_workers"], 0);
    }
}
