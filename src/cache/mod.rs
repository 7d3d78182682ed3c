//! In-memory conversation cache module
//!
//! Provides [`ConversationStore`], a lock-protected implementation of
//! [`ConversationCache`] for embedders that do not bring their own query
//! cache, and for tests.

mod conversation;
mod invalidation;

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::Conversation;
use crate::traits::{CacheScope, ConversationCache, Reducer};

#[derive(Debug, Default)]
struct StoreInner {
    /// Cached conversations indexed by id
    conversations: HashMap<String, Conversation>,
    /// Insertion order of conversation ids (most recent first)
    order: Vec<String>,
    /// Scopes invalidated since they were last marked fresh
    stale: HashSet<CacheScope>,
}

/// Shared conversation cache backed by a `RwLock`.
///
/// Every write is a single read-modify-write under the write lock, so a
/// reducer always sees the latest committed value.
#[derive(Debug, Default)]
pub struct ConversationStore {
    inner: RwLock<StoreInner>,
}

impl ConversationStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read_inner(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clear all cached data
    pub fn clear(&self) {
        let mut inner = self.write_inner();
        inner.conversations.clear();
        inner.order.clear();
        inner.stale.clear();
    }
}

impl ConversationCache for ConversationStore {
    fn read(&self, conversation_id: &str) -> Option<Conversation> {
        self.get(conversation_id)
    }

    fn write(&self, conversation_id: &str, reducer: Reducer<'_>) -> bool {
        let mut inner = self.write_inner();
        match inner.conversations.get_mut(conversation_id) {
            Some(current) => {
                let next = reducer(current);
                *current = next;
                true
            }
            None => {
                tracing::debug!(conversation_id, "Cache write skipped, entry absent");
                false
            }
        }
    }

    fn invalidate(&self, scope: CacheScope) {
        self.mark_stale(scope);
    }
}
