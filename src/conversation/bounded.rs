//! Retention policy decorator for conversation stores.
//!
//! Caps each conversation to its most recent N messages and/or drops whole
//! conversations that have been idle longer than a TTL. The wrapped store
//! keeps serving reads and appends; the decorator trims after appends and
//! sweeps idle conversations at most once per TTL period, piggybacking on
//! appends or on explicit sweep calls.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{ConversationId, ConversationStore, Message, RetentionTarget};
use crate::config::HistoryConfig;
use crate::log_component;

/// A [`ConversationStore`] with a capacity and/or idle-age limit.
#[derive(Debug, Clone)]
pub struct BoundedConversationStore<S> {
    inner: S,
    max_messages: Option<usize>,
    idle_ttl: Option<Duration>,
    /// Unix seconds of the last idle sweep, shared between clones
    last_sweep: Arc<AtomicI64>,
}

impl<S> BoundedConversationStore<S>
where
    S: ConversationStore + RetentionTarget,
{
    /// Wrap `inner` with no limits; add them with the builder methods.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            max_messages: None,
            idle_ttl: None,
            last_sweep: Arc::new(AtomicI64::new(Utc::now().timestamp())),
        }
    }

    /// Wrap `inner` with the limits from a [`HistoryConfig`].
    pub fn from_config(inner: S, cfg: &HistoryConfig) -> Self {
        let mut store = Self::new(inner);
        store.max_messages = cfg.max_messages_per_conversation.map(|max| max.max(1));
        store.idle_ttl = cfg.idle_ttl_secs.map(Duration::from_secs);
        store
    }

    /// Keep at most `max` messages per conversation (0 is treated as 1).
    pub fn with_max_messages(mut self, max: usize) -> Self {
        self.max_messages = Some(max.max(1));
        self
    }

    /// Drop conversations idle for longer than `ttl` on each sweep.
    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = Some(ttl);
        self
    }

    /// The configured idle TTL, if any.
    pub fn idle_ttl(&self) -> Option<Duration> {
        self.idle_ttl
    }

    /// Drop idle conversations now. Returns how many were dropped.
    pub async fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now()).await
    }

    /// Drop conversations idle as of `now`. Returns how many were dropped.
    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let Some(ttl) = self.idle_ttl else {
            return 0;
        };
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return 0;
        };
        let removed = self.inner.remove_idle_since(now - ttl).await;
        if removed > 0 {
            log_component!(debug, "store", "expired idle conversations", removed = removed);
        }
        removed
    }

    /// Sweep if at least one TTL period has passed since the last sweep.
    /// Returns how many conversations were dropped.
    pub async fn sweep_if_due(&self, now: DateTime<Utc>) -> usize {
        let Some(ttl) = self.idle_ttl else {
            return 0;
        };
        let interval = i64::try_from(ttl.as_secs().max(1)).unwrap_or(i64::MAX);
        let last = self.last_sweep.load(Ordering::Acquire);
        if now.timestamp().saturating_sub(last) < interval {
            return 0;
        }
        // Only one concurrent caller wins the slot.
        if self
            .last_sweep
            .compare_exchange(last, now.timestamp(), Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return 0;
        }
        self.sweep_expired_at(now).await
    }

    /// Borrow the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S> ConversationStore for BoundedConversationStore<S>
where
    S: ConversationStore + RetentionTarget,
{
    async fn append(&self, id: &ConversationId, message: Message) {
        self.inner.append(id, message).await;
        if let Some(max) = self.max_messages {
            self.inner.retain_last(id, max).await;
        }
        self.sweep_if_due(Utc::now()).await;
    }

    async fn history_of(&self, id: &ConversationId) -> Vec<Message> {
        self.inner.history_of(id).await
    }

    async fn len(&self, id: &ConversationId) -> usize {
        self.inner.len(id).await
    }

    async fn conversation_count(&self) -> usize {
        self.inner.conversation_count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::InMemoryConversationStore;

    #[tokio::test]
    async fn test_capacity_keeps_most_recent() {
        let store =
            BoundedConversationStore::new(InMemoryConversationStore::new()).with_max_messages(3);
        let id = ConversationId::new("ctx");

        for i in 0..10 {
            store
                .append(&id, Message::user_text(&i.to_string()))
                .await;
        }

        let texts: Vec<String> = store
            .history_of(&id)
            .await
            .iter()
            .map(Message::flatten_text)
            .collect();
        assert_eq!(texts, vec!["7", "8", "9"]);
    }

    #[tokio::test]
    async fn test_unbounded_by_default() {
        let store = BoundedConversationStore::new(InMemoryConversationStore::new());
        let id = ConversationId::new("ctx");
        for _ in 0..20 {
            store.append(&id, Message::user_text("x")).await;
        }
        assert_eq!(store.len(&id).await, 20);
        assert_eq!(store.sweep_expired().await, 0);
    }

    #[tokio::test]
    async fn test_sweep_drops_idle_conversations() {
        let store = BoundedConversationStore::new(InMemoryConversationStore::new())
            .with_idle_ttl(Duration::from_secs(60));
        store
            .append(&ConversationId::new("a"), Message::user_text("x"))
            .await;

        assert_eq!(store.sweep_expired().await, 0);
        assert_eq!(store.conversation_count().await, 1);

        let later = Utc::now() + chrono::Duration::seconds(120);
        assert_eq!(store.sweep_expired_at(later).await, 1);
        assert_eq!(store.conversation_count().await, 0);
    }

    #[tokio::test]
    async fn test_sweep_if_due_runs_once_per_period() {
        let store = BoundedConversationStore::new(InMemoryConversationStore::new())
            .with_idle_ttl(Duration::from_secs(60));
        store
            .append(&ConversationId::new("old"), Message::user_text("x"))
            .await;

        assert_eq!(store.sweep_if_due(Utc::now()).await, 0);

        let later = Utc::now() + chrono::Duration::seconds(120);
        assert_eq!(store.sweep_if_due(later).await, 1);

        store
            .append(&ConversationId::new("new"), Message::user_text("y"))
            .await;
        let soon_after = later + chrono::Duration::seconds(1);
        assert_eq!(store.sweep_if_due(soon_after).await, 0);
    }

    #[tokio::test]
    async fn test_from_config() {
        let cfg = HistoryConfig {
            max_messages_per_conversation: Some(2),
            idle_ttl_secs: Some(30),
        };
        let store = BoundedConversationStore::from_config(InMemoryConversationStore::new(), &cfg);
        assert_eq!(store.idle_ttl(), Some(Duration::from_secs(30)));

        let id = ConversationId::new("ctx");
        for _ in 0..4 {
            store.append(&id, Message::user_text("x")).await;
        }
        assert_eq!(store.len(&id).await, 2);
    }
}
