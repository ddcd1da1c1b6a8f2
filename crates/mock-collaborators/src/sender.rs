//! Recording channel sender.

use std::sync::atomic::{AtomicUsize, Ordering};

use chat_core::{async_trait, ChannelSender, DeliveryResult};
use tokio::sync::{Mutex, Notify};

/// A [`ChannelSender`] that stores deliveries instead of sending them.
#[derive(Debug, Default)]
pub struct RecordingSender {
    deliveries: Mutex<Vec<(String, String)>>,
    notify: Notify,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delivered message as `(session_key, text)`, in delivery order.
    pub async fn deliveries(&self) -> Vec<(String, String)> {
        self.deliveries.lock().await.clone()
    }

    /// Messages delivered to one session, in order.
    pub async fn messages_for(&self, session_key: &str) -> Vec<String> {
        self.deliveries
            .lock()
            .await
            .iter()
            .filter(|(key, _)| key == session_key)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Wait until at least `n` messages have been delivered in total.
    pub async fn wait_for(&self, n: usize) -> Vec<(String, String)> {
        loop {
            let notified = self.notify.notified();
            {
                let deliveries = self.deliveries.lock().await;
                if deliveries.len() >= n {
                    return deliveries.clone();
                }
            }
            notified.await;
        }
    }
}

#[async_trait]
impl ChannelSender for RecordingSender {
    async fn deliver(&self, session_key: &str, messages: &[String]) -> DeliveryResult {
        let mut deliveries = self.deliveries.lock().await;
        for message in messages {
            deliveries.push((session_key.to_string(), message.clone()));
        }
        drop(deliveries);
        self.notify.notify_waiters();

        DeliveryResult {
            delivered: messages.len(),
            errors: Vec::new(),
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// A sender whose first `n` deliveries fail outright; later ones are
/// recorded like [`RecordingSender`].
#[derive(Debug, Default)]
pub struct FlakySender {
    failures_left: AtomicUsize,
    attempts: AtomicUsize,
    recorded: RecordingSender,
}

impl FlakySender {
    pub fn failing_first(n: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(n),
            ..Default::default()
        }
    }

    /// Deliveries attempted so far, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// The deliveries that went through.
    pub fn recorded(&self) -> &RecordingSender {
        &self.recorded
    }
}

#[async_trait]
impl ChannelSender for FlakySender {
    async fn deliver(&self, session_key: &str, messages: &[String]) -> DeliveryResult {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return DeliveryResult {
                delivered: 0,
                errors: messages.iter().map(|_| "send failed".to_string()).collect(),
            };
        }

        self.recorded.deliver(session_key, messages).await
    }

    fn name(&self) -> &str {
        "flaky"
    }
}
