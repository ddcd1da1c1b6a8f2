//! Per-turn dialogue state machine.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chat_core::{
    Channel, ChatError, ConversationStore, DialogueState, Intent, LeadData, ProductRef,
    ProductSearch, RequestType, ResponseGenerator, Session, Turn, MAX_PRODUCTS_PER_TURN,
};
use lead_detect::{category_hint, classify, extract, is_handoff_request};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::DialogueError;
use crate::notifier::{conversation_summary, LeadNotifier};
use crate::replies;

/// Default contact line appended to fallback and apology replies.
pub const DEFAULT_CONTACT_CHANNEL: &str = "el formulario de contacto de la tienda";

/// Tunables for the dialogue controller.
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    /// Upper bound on one AI call (default: 20s)
    pub ai_timeout: Duration,
    /// Upper bound on one catalog lookup (default: 5s)
    pub product_search_timeout: Duration,
    /// Maximum products requested from the catalog (default: 5)
    pub product_limit: usize,
    /// Turns of history sent to the AI (default: 10)
    pub history_turns: usize,
    /// Where to send users when the assistant cannot help
    pub contact_channel_text: String,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            ai_timeout: Duration::from_secs(20),
            product_search_timeout: Duration::from_secs(5),
            product_limit: 5,
            history_turns: 10,
            contact_channel_text: DEFAULT_CONTACT_CHANNEL.to_string(),
        }
    }
}

/// A normalized inbound user message.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub channel: Channel,
    pub session_key: String,
    pub text: String,
    /// Explicit "talk to a person" button on the web widget.
    pub handoff: bool,
    /// Provider message id, used to drop redeliveries.
    pub message_id: Option<String>,
}

impl TurnRequest {
    /// A message from the web chat widget.
    pub fn web(session_key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: Channel::Web,
            session_key: session_key.into(),
            text: text.into(),
            handoff: false,
            message_id: None,
        }
    }

    /// A text message from a WhatsApp sender, keyed by phone number.
    pub fn whatsapp(
        phone: impl Into<String>,
        text: impl Into<String>,
        message_id: impl Into<String>,
    ) -> Self {
        Self {
            channel: Channel::WhatsApp,
            session_key: phone.into(),
            text: text.into(),
            handoff: false,
            message_id: Some(message_id.into()),
        }
    }

    /// Builder method to set the handoff flag.
    pub fn with_handoff(mut self, handoff: bool) -> Self {
        self.handoff = handoff;
        self
    }
}

/// What the assistant says back for one turn.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub reply: String,
    /// Second assistant message produced in the same turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
    /// Products shown with the reply (at most three).
    pub products: Vec<ProductRef>,
    /// Classified intent, for widget debugging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_debug: Option<String>,
    /// Background lead notification dispatched by this turn, if any.
    #[serde(skip)]
    pub notification: Option<JoinHandle<()>>,
}

impl TurnResponse {
    /// A reply with no products and no AI involvement.
    pub fn scripted(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ..Default::default()
        }
    }

    /// Every message to put in front of the user, in order.
    pub fn messages(&self) -> Vec<String> {
        let mut messages = vec![self.reply.clone()];
        if let Some(follow_up) = &self.follow_up {
            messages.push(follow_up.clone());
        }
        messages
    }

    fn with_intent(mut self, intent: Intent) -> Self {
        self.intent_debug = Some(intent.as_str().to_string());
        self
    }
}

/// Runs one conversational turn against a session.
///
/// The controller owns no state of its own; everything lives in the
/// [`ConversationStore`], and every turn holds that session's lock from start
/// to finish so same-key turns run strictly one after another. Session
/// history is only written after every collaborator call has returned, so a
/// turn dropped halfway leaves nothing behind.
pub struct DialogueController {
    store: Arc<ConversationStore>,
    generator: Arc<dyn ResponseGenerator>,
    catalog: Arc<dyn ProductSearch>,
    notifier: LeadNotifier,
    config: DialogueConfig,
}

impl DialogueController {
    pub fn new(
        store: Arc<ConversationStore>,
        generator: Arc<dyn ResponseGenerator>,
        catalog: Arc<dyn ProductSearch>,
        notifier: LeadNotifier,
        config: DialogueConfig,
    ) -> Self {
        info!(
            generator = generator.name(),
            ai_timeout_secs = config.ai_timeout.as_secs(),
            "Created dialogue controller"
        );
        Self {
            store,
            generator,
            catalog,
            notifier,
            config,
        }
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    pub fn config(&self) -> &DialogueConfig {
        &self.config
    }

    /// Process one user message end-to-end.
    ///
    /// Collaborator failures never surface here: a failed or slow AI turns
    /// into the fallback reply, a failed catalog into an empty product list,
    /// a failed email into a log line.
    pub async fn handle_turn(&self, request: TurnRequest) -> Result<TurnResponse, DialogueError> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(DialogueError::EmptyMessage);
        }

        let mut session = self.store.lock(request.channel, &request.session_key).await;

        if let Some(id) = request.message_id.as_deref() {
            if !session.remember_message_id(id) {
                debug!(
                    session_key = %request.session_key,
                    message_id = %id,
                    "Dropping redelivered message"
                );
                return Err(DialogueError::Skipped(format!("duplicate message {}", id)));
            }
        }

        info!(
            channel = %request.channel,
            session_key = %request.session_key,
            state = ?session.dialogue_state,
            "Processing turn"
        );

        let state = session.dialogue_state;
        let response = match state {
            DialogueState::AwaitingHumanHandoffTopic => self.capture_topic(&mut session, text),
            DialogueState::AwaitingContactData => self.complete_handoff(&mut session, text),
            DialogueState::Normal if request.handoff || is_handoff_request(text) => {
                self.start_handoff(&mut session, text)
            }
            DialogueState::Normal => self.normal_turn(&mut session, text).await,
        };

        Ok(response)
    }

    fn start_handoff(&self, session: &mut Session, text: &str) -> TurnResponse {
        info!(session_key = %session.session_key, "Human handoff requested");
        session.append(Turn::user(text));
        session.append(Turn::assistant(replies::ASK_HANDOFF_TOPIC));
        session.set_state(DialogueState::AwaitingHumanHandoffTopic, None);
        TurnResponse::scripted(replies::ASK_HANDOFF_TOPIC)
    }

    fn capture_topic(&self, session: &mut Session, text: &str) -> TurnResponse {
        debug!(session_key = %session.session_key, topic = %text, "Captured handoff topic");
        session.append(Turn::user(text));
        session.append(Turn::assistant(replies::ASK_CONTACT_DATA));
        session.set_state(DialogueState::AwaitingContactData, Some(text.to_string()));
        TurnResponse::scripted(replies::ASK_CONTACT_DATA)
    }

    fn complete_handoff(&self, session: &mut Session, text: &str) -> TurnResponse {
        session.append(Turn::user(text));

        let mut lead = extract(&session.user_text()).unwrap_or_default();
        lead.request_type = RequestType::HumanAssistance;
        lead.interest = session.pending_topic.clone();
        if session.channel == Channel::WhatsApp && lead.phone.is_none() {
            lead.phone = Some(session.session_key.clone());
        }

        session.append(Turn::assistant(replies::HANDOFF_CONFIRMATION));
        session.record_handoff();
        session.set_state(DialogueState::Normal, None);

        info!(
            session_key = %session.session_key,
            handoff_requests = session.handoff_requests,
            "Human handoff completed"
        );

        let mut response = TurnResponse::scripted(replies::HANDOFF_CONFIRMATION);
        response.notification = Some(self.dispatch(lead, session));
        response
    }

    async fn normal_turn(&self, session: &mut Session, text: &str) -> TurnResponse {
        let intent = classify(text);
        debug!(session_key = %session.session_key, %intent, "Classified turn");

        if intent == Intent::Greeting {
            session.append(Turn::user(text));
            session.append(Turn::assistant(replies::GREETING_MENU));
            return TurnResponse::scripted(replies::GREETING_MENU).with_intent(intent);
        }

        let products = if intent.wants_products() {
            self.find_products(text).await
        } else {
            Vec::new()
        };

        // A purchase intent refers back to whatever was shown last
        let shown_before = session.last_products().to_vec();
        let context = if products.is_empty() && intent == Intent::PurchaseIntent {
            shown_before.as_slice()
        } else {
            products.as_slice()
        };

        let reply = self
            .generate_reply(text, context, session.recent_turns(self.config.history_turns))
            .await;

        session.append(Turn::user(text));
        session.append(Turn::assistant_with_products(reply.clone(), &products));

        let notification = self.capture_lead(session);

        let follow_up = if intent == Intent::PurchaseIntent && !context.is_empty() {
            session.append(Turn::assistant(replies::PURCHASE_FOLLOW_UP));
            Some(replies::PURCHASE_FOLLOW_UP.to_string())
        } else {
            None
        };

        TurnResponse {
            reply,
            follow_up,
            products: products.into_iter().take(MAX_PRODUCTS_PER_TURN).collect(),
            intent_debug: None,
            notification,
        }
        .with_intent(intent)
    }

    async fn find_products(&self, text: &str) -> Vec<ProductRef> {
        let lookup = self.lookup_products(text);
        match bounded(self.config.product_search_timeout, lookup).await {
            Ok(products) => products,
            Err(e) => {
                warn!("Product search failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn lookup_products(&self, text: &str) -> Result<Vec<ProductRef>, ChatError> {
        let limit = self.config.product_limit;
        let found = self.catalog.search(text, limit).await?;
        if !found.is_empty() {
            return Ok(found);
        }

        match category_hint(text) {
            Some(category) => {
                debug!(category, "No direct matches, browsing category");
                self.catalog.by_category(category, limit).await
            }
            None => Ok(found),
        }
    }

    async fn generate_reply(&self, text: &str, products: &[ProductRef], history: &[Turn]) -> String {
        let call = self.generator.generate(text, products, history);
        match bounded(self.config.ai_timeout, call).await {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => {
                warn!(generator = self.generator.name(), "Generator returned an empty reply");
                replies::fallback(&self.config.contact_channel_text)
            }
            Err(e) => {
                warn!(generator = self.generator.name(), "Generator failed: {}", e);
                replies::fallback(&self.config.contact_channel_text)
            }
        }
    }

    /// Dispatch the normal-path lead once per session.
    fn capture_lead(&self, session: &mut Session) -> Option<JoinHandle<()>> {
        if session.lead_submitted {
            return None;
        }

        // Name-only leads wait until an email or phone shows up
        let lead = extract(&session.user_text()).filter(LeadData::has_contact_method)?;
        if !session.mark_lead_submitted() {
            return None;
        }

        info!(session_key = %session.session_key, "Captured chatbot lead");
        Some(self.dispatch(lead, session))
    }

    fn dispatch(&self, lead: LeadData, session: &Session) -> JoinHandle<()> {
        self.notifier
            .notify(lead, conversation_summary(&session.turns), &session.session_key)
    }
}

/// Run a collaborator call, turning an elapsed deadline into [`ChatError::Timeout`].
async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, ChatError>
where
    F: Future<Output = Result<T, ChatError>>,
{
    timeout(limit, call)
        .await
        .unwrap_or(Err(ChatError::Timeout(limit)))
}
