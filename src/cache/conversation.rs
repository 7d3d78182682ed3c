//! Conversation entry management for ConversationStore

use crate::models::Conversation;
use crate::traits::CacheScope;

use super::ConversationStore;

impl ConversationStore {
    /// Get a copy of a cached conversation
    pub fn get(&self, conversation_id: &str) -> Option<Conversation> {
        self.read_inner().conversations.get(conversation_id).cloned()
    }

    /// Add or replace a conversation.
    ///
    /// The id moves to the front of the order and its detail scope is
    /// considered fresh again.
    pub fn insert(&self, conversation: Conversation) {
        let mut inner = self.write_inner();
        let id = conversation.id.clone();

        inner.order.retain(|existing| existing != &id);
        inner.order.insert(0, id.clone());
        inner.stale.remove(&CacheScope::Conversation(id.clone()));
        inner.conversations.insert(id, conversation);
    }

    /// Remove a conversation. Returns the evicted entry, if any.
    pub fn evict(&self, conversation_id: &str) -> Option<Conversation> {
        let mut inner = self.write_inner();
        inner.order.retain(|existing| existing != conversation_id);
        inner
            .stale
            .remove(&CacheScope::Conversation(conversation_id.to_string()));
        inner.conversations.remove(conversation_id)
    }

    /// Whether the store holds an entry for this id
    pub fn contains(&self, conversation_id: &str) -> bool {
        self.read_inner().conversations.contains_key(conversation_id)
    }

    /// Conversation ids, most recently inserted first
    pub fn conversation_ids(&self) -> Vec<String> {
        self.read_inner().order.clone()
    }

    pub fn len(&self) -> usize {
        self.read_inner().conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
