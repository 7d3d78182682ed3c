//! Stale-scope tracking for ConversationStore

use crate::traits::CacheScope;

use super::ConversationStore;

impl ConversationStore {
    /// Record that a scope must be refetched
    pub fn mark_stale(&self, scope: CacheScope) {
        tracing::debug!(?scope, "Cache scope invalidated");
        self.write_inner().stale.insert(scope);
    }

    /// Whether a scope was invalidated and not yet refreshed
    pub fn is_stale(&self, scope: &CacheScope) -> bool {
        self.read_inner().stale.contains(scope)
    }

    /// Clear the stale flag after the embedder refetched a scope.
    /// Returns true if the scope was stale.
    pub fn mark_fresh(&self, scope: &CacheScope) -> bool {
        self.write_inner().stale.remove(scope)
    }

    /// All scopes currently stale
    pub fn stale_scopes(&self) -> Vec<CacheScope> {
        self.read_inner().stale.iter().cloned().collect()
    }
}
