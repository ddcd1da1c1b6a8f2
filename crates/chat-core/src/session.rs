//! Per-conversation state.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::types::{Channel, DialogueState, ProductRef, Turn};

/// How many provider message ids a session remembers for redelivery checks.
pub const MAX_SEEN_MESSAGE_IDS: usize = 64;

/// One continuous conversation.
///
/// Sessions are owned by the [`ConversationStore`](crate::ConversationStore);
/// callers only ever see them through a lock guard or as a cloned snapshot.
/// Every mutating method refreshes the activity clock used for eviction.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_key: String,
    pub channel: Channel,
    /// Insertion-ordered history; this is the literal prompt history.
    pub turns: Vec<Turn>,
    pub dialogue_state: DialogueState,
    /// The user's stated need, captured when entering contact collection.
    pub pending_topic: Option<String>,
    /// Set once the normal-path lead notification has been dispatched.
    pub lead_submitted: bool,
    /// Number of completed human-handoff requests.
    pub handoff_requests: u32,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    seen_message_ids: VecDeque<String>,
    touched: Instant,
}

impl Session {
    /// Create an empty session in the [`DialogueState::Normal`] state.
    pub fn new(session_key: impl Into<String>, channel: Channel) -> Self {
        let now = Utc::now();
        Self {
            session_key: session_key.into(),
            channel,
            turns: Vec::new(),
            dialogue_state: DialogueState::Normal,
            pending_topic: None,
            lead_submitted: false,
            handoff_requests: 0,
            created_at: now,
            last_activity_at: now,
            seen_message_ids: VecDeque::new(),
            touched: Instant::now(),
        }
    }

    /// Refresh the activity timestamps.
    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
        self.touched = Instant::now();
    }

    /// Append a turn to the history.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.touch();
    }

    /// Move to a new dialogue state, replacing the pending topic.
    pub fn set_state(&mut self, state: DialogueState, pending_topic: Option<String>) {
        self.dialogue_state = state;
        self.pending_topic = pending_topic;
        self.touch();
    }

    /// Mark the normal-path lead as submitted.
    ///
    /// Returns `true` only for the call that flipped the flag.
    pub fn mark_lead_submitted(&mut self) -> bool {
        self.touch();
        if self.lead_submitted {
            return false;
        }
        self.lead_submitted = true;
        true
    }

    /// Count a completed human-handoff request.
    pub fn record_handoff(&mut self) {
        self.handoff_requests += 1;
        self.touch();
    }

    /// Remember a provider message id.
    ///
    /// Returns `false` if the id was already seen (a redelivery).
    pub fn remember_message_id(&mut self, id: &str) -> bool {
        if self.seen_message_ids.iter().any(|seen| seen == id) {
            return false;
        }
        self.seen_message_ids.push_back(id.to_string());
        while self.seen_message_ids.len() > MAX_SEEN_MESSAGE_IDS {
            self.seen_message_ids.pop_front();
        }
        self.touch();
        true
    }

    /// All user text in the session, one turn per line.
    pub fn user_text(&self) -> String {
        self.turns
            .iter()
            .filter(|t| t.is_user())
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The last `n` turns (all of them if fewer).
    pub fn recent_turns(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Products attached to the most recent assistant turn that had any.
    pub fn last_products(&self) -> &[ProductRef] {
        self.turns
            .iter()
            .rev()
            .find(|t| !t.products.is_empty())
            .map(|t| t.products.as_slice())
            .unwrap_or(&[])
    }

    /// Time since the last mutation.
    pub fn idle_for(&self) -> Duration {
        Instant::now().saturating_duration_since(self.touched)
    }

    /// Whether the session has been idle for longer than `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.idle_for() > ttl
    }
}
