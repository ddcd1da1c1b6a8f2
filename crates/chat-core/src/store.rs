//! In-process conversation store.
//!
//! Sessions live in an insertion-ordered map keyed by `"{channel}:{session_key}"`.
//! Each session sits behind its own async mutex, so turns for one key are
//! serialized while unrelated keys proceed concurrently. The map itself is
//! only locked for the short lookups/inserts and during eviction scans.

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::session::Session;
use crate::types::{Channel, DialogueState, Turn};

/// Default idle time after which a session is discarded.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Default cap on the number of tracked sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Exclusive access to one session for the duration of a turn.
pub type SessionGuard = OwnedMutexGuard<Session>;

type SessionHandle = Arc<Mutex<Session>>;

/// Time-bounded session cache with per-key serialized mutation.
///
/// Lookups never fail: an absent or expired key yields a fresh session.
pub struct ConversationStore {
    sessions: Mutex<IndexMap<String, SessionHandle>>,
    ttl: Duration,
    max_sessions: usize,
}

impl ConversationStore {
    /// Create a store with the given idle TTL and the default session cap.
    pub fn new(ttl: Duration) -> Self {
        Self::with_limits(ttl, DEFAULT_MAX_SESSIONS)
    }

    /// Create a store with an explicit TTL and session cap.
    pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(IndexMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Lock a session for a whole turn, creating it if absent.
    ///
    /// Callers for the same key queue in FIFO order. A session that expired
    /// before the background sweep reached it is replaced by a fresh one.
    pub async fn lock(&self, channel: Channel, session_key: &str) -> SessionGuard {
        let handle = self.handle(channel, session_key).await;
        let mut guard = handle.lock_owned().await;

        if guard.is_expired(self.ttl) {
            debug!(
                channel = %channel,
                session_key = %session_key,
                "Session expired on access, starting fresh"
            );
            *guard = Session::new(session_key, channel);
        }

        guard
    }

    /// Snapshot of a session (created if absent).
    pub async fn get(&self, channel: Channel, session_key: &str) -> Session {
        self.lock(channel, session_key).await.clone()
    }

    /// Append a turn to a session.
    pub async fn append(&self, channel: Channel, session_key: &str, turn: Turn) {
        self.lock(channel, session_key).await.append(turn);
    }

    /// Set the dialogue state and pending topic of a session.
    pub async fn set_state(
        &self,
        channel: Channel,
        session_key: &str,
        state: DialogueState,
        pending_topic: Option<String>,
    ) {
        self.lock(channel, session_key)
            .await
            .set_state(state, pending_topic);
    }

    /// Mark a session's normal-path lead as submitted.
    ///
    /// Returns `true` if this call flipped the flag.
    pub async fn mark_lead_submitted(&self, channel: Channel, session_key: &str) -> bool {
        self.lock(channel, session_key).await.mark_lead_submitted()
    }

    /// Remove every idle session older than the TTL.
    ///
    /// Sessions that are locked, or have a task waiting on their lock, are
    /// left alone. Returns the number of sessions removed.
    pub async fn evict_expired(&self) -> usize {
        let ttl = self.ttl;
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();

        sessions.retain(|_, handle| {
            if Arc::strong_count(handle) > 1 {
                return true;
            }
            let expired = match handle.try_lock() {
                Ok(session) => session.is_expired(ttl),
                Err(_) => false,
            };
            !expired
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "Evicted expired sessions");
        }
        evicted
    }

    /// Number of tracked sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    /// Start a background task that sweeps expired sessions every `interval`.
    pub fn start_eviction_task(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store = Arc::clone(self);

        tokio::spawn(async move {
            info!(
                "Session eviction running every {:?} (ttl {:?})",
                interval, store.ttl
            );

            loop {
                tokio::time::sleep(interval).await;
                store.evict_expired().await;
            }
        })
    }

    /// Get or create the handle for a key under the map lock.
    async fn handle(&self, channel: Channel, session_key: &str) -> SessionHandle {
        let map_key = format!("{}:{}", channel, session_key);
        let mut sessions = self.sessions.lock().await;

        if let Some(handle) = sessions.get(&map_key) {
            return Arc::clone(handle);
        }

        if sessions.len() >= self.max_sessions {
            evict_least_recent(&mut sessions);
        }

        let handle = Arc::new(Mutex::new(Session::new(session_key, channel)));
        sessions.insert(map_key, Arc::clone(&handle));
        handle
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

/// Drop the idle session that has gone the longest without activity.
fn evict_least_recent(sessions: &mut IndexMap<String, SessionHandle>) {
    let oldest = sessions
        .iter()
        .enumerate()
        .filter(|(_, (_, handle))| Arc::strong_count(handle) == 1)
        .filter_map(|(index, (_, handle))| {
            handle.try_lock().ok().map(|session| (index, session.idle_for()))
        })
        .max_by_key(|(_, idle)| *idle)
        .map(|(index, _)| index);

    if let Some(index) = oldest {
        if let Some((key, _)) = sessions.swap_remove_index(index) {
            debug!(session = %key, "Session cap reached, evicted least recently used");
        }
    }
}
