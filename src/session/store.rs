//! Per-session conversation state.
//!
//! Each session holds an ordered message history that is capped at
//! `HISTORY_WINDOW` messages between requests. Sessions are created
//! implicitly on first reference and live until they are explicitly
//! reset.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OwnedMutexGuard;

/// Maximum number of messages retained per session between requests.
pub const HISTORY_WINDOW: usize = 20;

/// Session used when the caller does not supply one.
pub const DEFAULT_SESSION: &str = "default";

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

/// A single conversation turn. Immutable once appended to a session.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

/// Exclusive hold on a session while a request is in flight. Dropping
/// it lets the next request for the same session proceed.
pub struct SessionLease {
    _guard: OwnedMutexGuard<()>,
}

/// Storage for conversation history, keyed by session id.
///
/// The store is the only component that mutates a session's history;
/// callers always receive clones.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the session's history, registering an empty one if the
    /// session has not been seen before.
    async fn get_or_create(&self, session_id: &str) -> Vec<Message>;

    /// Appends a message to the session's history.
    async fn append(&self, session_id: &str, message: Message);

    /// Truncates history from the front until it holds at most
    /// `max_len` messages. Trims by raw message count, so a
    /// user/assistant pair can be split across the boundary.
    async fn enforce_window(&self, session_id: &str, max_len: usize);

    /// Deletes the session's history. Returns whether any existed.
    async fn reset(&self, session_id: &str) -> bool;

    /// Acquires the session's lease. At most one request pipeline runs
    /// per session id; concurrent callers wait here.
    async fn lease(&self, session_id: &str) -> SessionLease;
}

struct SessionEntry {
    history: Vec<Message>,
    gate: Arc<tokio::sync::Mutex<()>>,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            history: Vec::new(),
            gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}

/// In-memory `SessionStore`. Sessions are never expired or evicted,
/// matching the lifetime of the process.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_or_create(&self, session_id: &str) -> Vec<Message> {
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        sessions
            .entry(session_id.to_string())
            .or_insert_with(SessionEntry::new)
            .history
            .clone()
    }

    async fn append(&self, session_id: &str, message: Message) {
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        sessions
            .entry(session_id.to_string())
            .or_insert_with(SessionEntry::new)
            .history
            .push(message);
    }

    async fn enforce_window(&self, session_id: &str, max_len: usize) {
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        if let Some(entry) = sessions.get_mut(session_id) {
            let len = entry.history.len();
            if len > max_len {
                entry.history.drain(0..len - max_len);
            }
        }
    }

    async fn reset(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        sessions.remove(session_id).is_some()
    }

    async fn lease(&self, session_id: &str) -> SessionLease {
        let gate = {
            let mut sessions = self.sessions.lock().expect("session map poisoned");
            Arc::clone(
                &sessions
                    .entry(session_id.to_string())
                    .or_insert_with(SessionEntry::new)
                    .gate,
            )
        };
        SessionLease {
            _guard: gate.lock_owned().await,
        }
    }
}
