//! Conversation history shared by every request in the process.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// One user/assistant exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub user: String,
    pub assistant: String,
}

impl Turn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// Append-only, insertion-ordered list of turns.
///
/// All access goes through an async `RwLock`, so concurrent appends are
/// serialized and none are lost. Callers must not hold a snapshot lock across
/// upstream calls; `all()` returns an owned copy for that reason.
#[derive(Debug, Default)]
pub struct ConversationStore {
    turns: RwLock<Vec<Turn>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end of the history.
    pub async fn append(&self, turn: Turn) {
        self.turns.write().await.push(turn);
    }

    /// Snapshot of all turns, oldest first.
    pub async fn all(&self) -> Vec<Turn> {
        self.turns.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.turns.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.turns.read().await.is_empty()
    }

    /// Drop all turns.
    pub async fn clear(&self) {
        self.turns.write().await.clear();
    }
}
