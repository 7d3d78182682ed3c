//! Conversation cache trait abstraction.
//!
//! The cache is owned by the embedding application and shared with other
//! views (message list, conversation list). The engine only reads it and
//! applies pure reducers through [`ConversationCache::write`].

use crate::models::Conversation;

/// Scope of a cache invalidation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheScope {
    /// The detail entry of one conversation
    Conversation(String),
    /// The list of all conversations
    ConversationList,
}

/// A pure state transition applied to a cached conversation
pub type Reducer<'a> = &'a dyn Fn(&Conversation) -> Conversation;

/// Trait for the shared conversation cache.
///
/// # Example
///
/// ```ignore
/// use convo_stream::traits::ConversationCache;
///
/// fn rename<C: ConversationCache>(cache: &C, id: &str) {
///     cache.write(id, &|conv| conv.clone().with_title("Plan 10k"));
/// }
/// ```
pub trait ConversationCache: Send + Sync {
    /// Current value of a conversation entry, if cached.
    fn read(&self, conversation_id: &str) -> Option<Conversation>;

    /// Atomically replace an entry with `reducer(current)`.
    ///
    /// When the entry is absent the reducer is not called and nothing is
    /// written. Returns whether the entry existed.
    fn write(&self, conversation_id: &str, reducer: Reducer<'_>) -> bool;

    /// Mark a scope as stale so dependent views refetch it.
    fn invalidate(&self, scope: CacheScope);
}
