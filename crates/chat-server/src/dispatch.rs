//! Per-phone WhatsApp processing queues.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chat_core::ChannelSender;
use dialogue::{replies, DialogueController, DialogueError, TurnRequest, TurnResponse};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};
use whatsapp_cloud::InboundMessage;

use crate::turn::{run_guarded, TurnOutcome};

type Queues = HashMap<String, UnboundedSender<InboundMessage>>;

/// Runs WhatsApp turns after the webhook has been acknowledged.
///
/// Messages from one phone are handled strictly in arrival order by a
/// worker task that exits once its queue is empty; different phones are
/// handled in parallel.
#[derive(Clone)]
pub struct WhatsAppDispatcher {
    inner: Arc<Inner>,
}

struct Inner {
    controller: Arc<DialogueController>,
    sender: Arc<dyn ChannelSender>,
    queues: Mutex<Queues>,
}

impl WhatsAppDispatcher {
    pub fn new(controller: Arc<DialogueController>, sender: Arc<dyn ChannelSender>) -> Self {
        info!(sender = sender.name(), "Created WhatsApp dispatcher");
        Self {
            inner: Arc::new(Inner {
                controller,
                sender,
                queues: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Queue a message for its sender's worker, starting one if needed.
    pub fn enqueue(&self, mut message: InboundMessage) {
        let phone = message.from.clone();
        let mut queues = self.inner.lock_queues();

        if let Some(tx) = queues.get(&phone) {
            match tx.send(message) {
                Ok(()) => return,
                // Worker died without deregistering; replace it
                Err(mpsc::error::SendError(returned)) => message = returned,
            }
        }

        let (tx, rx) = mpsc::unbounded_channel();
        if tx.send(message).is_err() {
            return;
        }
        queues.insert(phone.clone(), tx);
        drop(queues);

        debug!(phone = %phone, "Starting WhatsApp worker");
        let inner = Arc::clone(&self.inner);
        tokio::spawn(inner.drain(phone, rx));
    }

    /// Number of phones with a live worker.
    pub fn active_workers(&self) -> usize {
        self.inner.lock_queues().len()
    }
}

impl Inner {
    fn lock_queues(&self) -> MutexGuard<'_, Queues> {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn drain(self: Arc<Self>, phone: String, mut rx: UnboundedReceiver<InboundMessage>) {
        loop {
            let message = match rx.try_recv() {
                Ok(message) => message,
                Err(_) => {
                    // Deregister under the map lock so no message slips in between
                    let mut queues = self.lock_queues();
                    match rx.try_recv() {
                        Ok(message) => message,
                        Err(_) => {
                            queues.remove(&phone);
                            debug!(phone = %phone, "WhatsApp worker drained");
                            return;
                        }
                    }
                }
            };
            self.process(message).await;
        }
    }

    async fn process(&self, message: InboundMessage) {
        let phone = message.from.as_str();

        let outbound = match message.text_body() {
            None => {
                debug!(phone = %phone, kind = %message.kind, "Non-text message");
                vec![replies::TEXT_ONLY.to_string()]
            }
            Some(text) => {
                let request = TurnRequest::whatsapp(phone, text, message.id.as_str());
                match run_guarded(&self.controller, request).await {
                    TurnOutcome::Reply(response) => whatsapp_messages(&response),
                    TurnOutcome::Rejected(DialogueError::Skipped(reason)) => {
                        debug!(phone = %phone, "Skipped: {}", reason);
                        return;
                    }
                    TurnOutcome::Rejected(e) => {
                        warn!(phone = %phone, "Turn rejected: {}", e);
                        return;
                    }
                    TurnOutcome::Crashed => vec![replies::apology(
                        &self.controller.config().contact_channel_text,
                    )],
                }
            }
        };

        let result = self.sender.deliver(phone, &outbound).await;
        if !result.is_complete() {
            warn!(
                phone = %phone,
                delivered = result.delivered,
                failed = result.errors.len(),
                "WhatsApp reply partially delivered"
            );
        }
    }
}

/// WhatsApp has no product cards, so products are listed under the reply.
fn whatsapp_messages(response: &TurnResponse) -> Vec<String> {
    let mut messages = response.messages();
    if !response.products.is_empty() {
        let list = response
            .products
            .iter()
            .map(|p| format!("• {}", p.summary_line()))
            .collect::<Vec<_>>()
            .join("\n");
        if let Some(first) = messages.first_mut() {
            *first = format!("{}\n\n{}", first, list);
        }
    }
    messages
}
