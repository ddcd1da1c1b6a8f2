//! Integration tests for webhook parsing and verification.
//!
//! Run with:
//!   cargo test -p whatsapp-cloud --test webhook_tests

use whatsapp_cloud::{verify_webhook, VerifyParams, WebhookPayload};

// ============================================================================
// Payload parsing
// ============================================================================

mod payload_tests {
    use super::*;

    #[test]
    fn test_batched_messages_keep_order() {
        let json = r#"{
            "object": "whatsapp_business_account",
            "entry": [
                {"id": "1", "changes": [{"field": "messages", "value": {
                    "messaging_product": "whatsapp",
                    "messages": [
                        {"from": "5491111111111", "id": "wamid.a", "type": "text", "text": {"body": "hola"}},
                        {"from": "5491111111111", "id": "wamid.b", "type": "image", "image": {"id": "x"}}
                    ]
                }}]},
                {"id": "2", "changes": [{"field": "messages", "value": {
                    "messages": [
                        {"from": "5492222222222", "id": "wamid.c", "type": "text", "text": {"body": "  "}}
                    ]
                }}]}
            ]
        }"#;

        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = payload.messages().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["wamid.a", "wamid.b", "wamid.c"]);

        let bodies: Vec<_> = payload.messages().map(|m| m.text_body()).collect();
        assert_eq!(bodies, vec![Some("hola"), None, None]);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r#"{"object": "whatsapp_business_account", "entry": [], "extra": true}"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.messages().count(), 0);
    }

    #[test]
    fn test_empty_object_parses() {
        let payload: WebhookPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.entry.is_empty());
    }
}

// ============================================================================
// Verification
// ============================================================================

mod verify_tests {
    use super::*;

    #[test]
    fn test_query_string_shape() {
        let params: VerifyParams = serde_json::from_value(serde_json::json!({
            "hub.mode": "subscribe",
            "hub.verify_token": "tienda-token",
            "hub.challenge": "CHALLENGE_ACCEPTED"
        }))
        .unwrap();

        assert_eq!(
            verify_webhook(&params, "tienda-token").as_deref(),
            Some("CHALLENGE_ACCEPTED")
        );
        assert_eq!(verify_webhook(&params, "otro-token"), None);
    }
}
