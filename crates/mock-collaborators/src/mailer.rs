//! Lead mailer doubles.

use chat_core::{async_trait, ChatError, LeadMailer};
use tokio::sync::{Mutex, Notify};

/// One captured email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// A mailer that keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    notify: Notify,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Wait until at least `n` emails have been sent.
    ///
    /// Notifications are dispatched on background tasks, so tests use this
    /// instead of sleeping.
    pub async fn wait_for(&self, n: usize) -> Vec<SentMail> {
        loop {
            let notified = self.notify.notified();
            {
                let sent = self.sent.lock().await;
                if sent.len() >= n {
                    return sent.clone();
                }
            }
            notified.await;
        }
    }
}

#[async_trait]
impl LeadMailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), ChatError> {
        self.sent.lock().await.push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        self.notify.notify_waiters();
        Ok(())
    }
}

/// A mailer whose SMTP server always refuses.
#[derive(Debug, Default)]
pub struct FailingMailer;

#[async_trait]
impl LeadMailer for FailingMailer {
    async fn send(&self, _to: &str, _subject: &str, _html_body: &str) -> Result<(), ChatError> {
        Err(ChatError::Network("SMTP connection refused".to_string()))
    }
}
