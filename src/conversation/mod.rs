//! Conversation module - per-conversation message history
//!
//! The [`ConversationStore`] trait is the seam the executor writes through.
//! [`InMemoryConversationStore`] keeps histories for the process lifetime;
//! [`BoundedConversationStore`] wraps it with a retention policy.
//!
//! # Example
//!
//! ```
//! use skillrelay::conversation::{ConversationId, ConversationStore, InMemoryConversationStore, Message};
//!
//! # tokio_test::block_on(async {
//! let store = InMemoryConversationStore::new();
//! let id = ConversationId::new("ctx-1");
//!
//! store.append(&id, Message::user_text("Hello!")).await;
//! assert_eq!(store.history_of(&id).await.len(), 1);
//! # });
//! ```

pub mod bounded;
pub mod types;

pub use bounded::BoundedConversationStore;
pub use types::{ConversationId, Message, Part, PartKind, Role};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Storage for per-conversation message history.
///
/// Appends for the same conversation are serialized so the history reflects
/// arrival order. Reads never fail; unknown ids yield an empty history.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append a message, creating the history if absent.
    async fn append(&self, id: &ConversationId, message: Message);

    /// Snapshot of the history in arrival order.
    async fn history_of(&self, id: &ConversationId) -> Vec<Message>;

    /// Number of messages recorded for a conversation.
    async fn len(&self, id: &ConversationId) -> usize {
        self.history_of(id).await.len()
    }

    /// Number of conversations currently held.
    async fn conversation_count(&self) -> usize;
}

/// Eviction hooks used by [`BoundedConversationStore`].
///
/// Kept separate from [`ConversationStore`]: the plain store contract has no
/// deletion.
#[async_trait]
pub trait RetentionTarget: Send + Sync {
    /// Drop all but the most recent `keep` messages of a conversation.
    async fn retain_last(&self, id: &ConversationId, keep: usize);

    /// Drop conversations whose last append is older than `cutoff`.
    /// Returns how many were dropped.
    async fn remove_idle_since(&self, cutoff: DateTime<Utc>) -> usize;
}

/// One conversation's history plus bookkeeping.
#[derive(Debug)]
struct History {
    messages: Vec<Message>,
    last_append: DateTime<Utc>,
}

impl History {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
            last_append: Utc::now(),
        }
    }
}

/// Volatile in-memory conversation store.
///
/// Appends hold the outer map lock shared and their entry's mutex exclusively,
/// so appends to different conversations never wait on each other. Removing a
/// conversation takes the map lock exclusively and waits for in-flight appends.
#[derive(Debug, Default, Clone)]
pub struct InMemoryConversationStore {
    histories: Arc<RwLock<HashMap<ConversationId, Arc<Mutex<History>>>>>,
}

impl InMemoryConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, id: &ConversationId) -> Arc<Mutex<History>> {
        {
            let histories = self.histories.read().await;
            if let Some(history) = histories.get(id) {
                return Arc::clone(history);
            }
        }

        let mut histories = self.histories.write().await;
        Arc::clone(
            histories
                .entry(id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(History::new()))),
        )
    }

    async fn existing(&self, id: &ConversationId) -> Option<Arc<Mutex<History>>> {
        self.histories.read().await.get(id).map(Arc::clone)
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append(&self, id: &ConversationId, message: Message) {
        loop {
            {
                // The read guard stays held until the push lands, so an idle
                // sweep cannot unlink the entry in between.
                let histories = self.histories.read().await;
                if let Some(entry) = histories.get(id) {
                    let mut history = entry.lock().await;
                    history.messages.push(message);
                    history.last_append = Utc::now();
                    return;
                }
            }
            self.entry(id).await;
        }
    }

    async fn history_of(&self, id: &ConversationId) -> Vec<Message> {
        match self.existing(id).await {
            Some(entry) => entry.lock().await.messages.clone(),
            None => Vec::new(),
        }
    }

    async fn len(&self, id: &ConversationId) -> usize {
        match self.existing(id).await {
            Some(entry) => entry.lock().await.messages.len(),
            None => 0,
        }
    }

    async fn conversation_count(&self) -> usize {
        self.histories.read().await.len()
    }
}

#[async_trait]
impl RetentionTarget for InMemoryConversationStore {
    async fn retain_last(&self, id: &ConversationId, keep: usize) {
        if let Some(entry) = self.existing(id).await {
            let mut history = entry.lock().await;
            let excess = history.messages.len().saturating_sub(keep);
            if excess > 0 {
                history.messages.drain(..excess);
            }
        }
    }

    async fn remove_idle_since(&self, cutoff: DateTime<Utc>) -> usize {
        let mut histories = self.histories.write().await;
        let mut expired = Vec::new();
        for (id, entry) in histories.iter() {
            // A locked entry is mid-append and therefore not idle.
            if let Ok(history) = entry.try_lock() {
                if history.last_append < cutoff {
                    expired.push(id.clone());
                }
            }
        }
        for id in &expired {
            histories.remove(id);
        }
        expired.len()
    }
}
