//! Fire-and-forget lead notification.

use std::sync::Arc;

use askama::Template;
use chat_core::{LeadData, LeadMailer, Role, Turn};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Number of trailing turns quoted in the notification email.
pub const SUMMARY_TURNS: usize = 10;

/// Emails captured leads to the sales inbox.
///
/// Each notification runs on its own task; the caller gets the task handle
/// back and may ignore it. Send failures are logged and never retried.
#[derive(Clone)]
pub struct LeadNotifier {
    mailer: Arc<dyn LeadMailer>,
    to_address: String,
}

impl LeadNotifier {
    pub fn new(mailer: Arc<dyn LeadMailer>, to_address: impl Into<String>) -> Self {
        Self {
            mailer,
            to_address: to_address.into(),
        }
    }

    pub fn to_address(&self) -> &str {
        &self.to_address
    }

    /// Dispatch a lead email in the background.
    pub fn notify(
        &self,
        lead: LeadData,
        conversation_summary: String,
        session_key: &str,
    ) -> JoinHandle<()> {
        let mailer = Arc::clone(&self.mailer);
        let to = self.to_address.clone();
        let session_key = session_key.to_string();
        let subject = subject_for(&lead, &session_key);

        tokio::spawn(async move {
            let html = match LeadEmail::new(&lead, &conversation_summary, &session_key).render() {
                Ok(html) => html,
                Err(e) => {
                    error!(session_key = %session_key, "Failed to render lead email: {}", e);
                    return;
                }
            };

            match mailer.send(&to, &subject, &html).await {
                Ok(()) => info!(
                    session_key = %session_key,
                    request_type = ?lead.request_type,
                    "Lead notification sent"
                ),
                Err(e) => error!(
                    session_key = %session_key,
                    request_type = ?lead.request_type,
                    "Lead notification failed: {}",
                    e
                ),
            }
        })
    }
}

/// Plain-text transcript of the last [`SUMMARY_TURNS`] turns.
pub fn conversation_summary(turns: &[Turn]) -> String {
    let start = turns.len().saturating_sub(SUMMARY_TURNS);
    turns[start..]
        .iter()
        .map(|turn| {
            let who = match turn.role {
                Role::User => "Cliente",
                Role::Assistant => "Asistente",
            };
            format!("{}: {}", who, turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn subject_for(lead: &LeadData, session_key: &str) -> String {
    let who = lead
        .name
        .as_deref()
        .or(lead.email.as_deref())
        .or(lead.phone.as_deref())
        .unwrap_or(session_key);
    format!("{} - {}", lead.request_type.label(), who)
}

/// Body of the lead email. Every field is escaped by the template.
#[derive(Template)]
#[template(path = "lead_email.html")]
struct LeadEmail<'a> {
    title: &'a str,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    interest: &'a str,
    session_key: &'a str,
    transcript: Vec<&'a str>,
}

impl<'a> LeadEmail<'a> {
    fn new(lead: &'a LeadData, summary: &'a str, session_key: &'a str) -> Self {
        let field = |value: &'a Option<String>| value.as_deref().unwrap_or("-");
        Self {
            title: lead.request_type.label(),
            name: field(&lead.name),
            email: field(&lead.email),
            phone: field(&lead.phone),
            interest: field(&lead.interest),
            session_key,
            transcript: summary.lines().collect(),
        }
    }
}
