//! Webhook subscription handshake.

/// Query parameters Meta sends when registering a webhook URL.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Answer a webhook verification request.
///
/// Returns the challenge to echo back iff `mode` is "subscribe" and the token
/// matches `expected_token`; `None` means the caller should respond 403.
pub fn verify_webhook(params: &VerifyParams, expected_token: &str) -> Option<String> {
    match (&params.mode, &params.verify_token, &params.challenge) {
        (Some(mode), Some(token), Some(challenge))
            if mode == "subscribe" && !expected_token.is_empty() && token == expected_token =>
        {
            Some(challenge.clone())
        }
        _ => None,
    }
}
