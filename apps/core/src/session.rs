//! Ephemeral per-session chat history.
//!
//! Conversation messages live only in process memory for the lifetime of a
//! session; nothing is persisted. The store is the one piece of mutable
//! state in the process, so it sits behind an async RwLock.

use crate::models::ChatMessage;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory store of chat histories keyed by session id.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Vec<ChatMessage>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Append a message to a session, creating the session on first use.
    pub async fn append(&self, session_id: Uuid, role: &str, content: &str) {
        let message = ChatMessage {
            role: role.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .await
            .entry(session_id)
            .or_default()
            .push(message);
    }

    /// Snapshot of a session's history, or `None` for an unknown session.
    pub async fn messages(&self, session_id: Uuid) -> Option<Vec<ChatMessage>> {
        self.sessions.read().await.get(&session_id).cloned()
    }
}
