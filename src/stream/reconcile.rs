//! Optimistic updates and rollback against the shared conversation cache.
//!
//! Every cache change is one of the pure reducers below applied through
//! [`ConversationCache::write`]. Message ids and timestamps are created
//! before the reducer runs so a reducer only ever reshapes its input.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::StreamConfig;
use crate::error::StreamError;
use crate::models::{Conversation, Message, MessageRole, RecommendationPayload};
use crate::traits::{CacheScope, ConversationCache, Notification, NotificationSink};

/// Drop every provisional message, keeping the rest in order.
pub fn remove_provisional(conversation: &Conversation) -> Conversation {
    let mut next = conversation.clone();
    next.messages.retain(|message| !message.is_provisional());
    next
}

/// Append a provisional user message.
///
/// Leftover provisional messages (from an attempt that was superseded
/// before it resolved) are dropped first, so at most one is ever present.
pub fn insert_provisional_user(conversation: &Conversation, message: &Message) -> Conversation {
    let mut next = remove_provisional(conversation);
    next.messages.push(message.clone());
    next
}

/// Replace provisional messages with the final ones.
pub fn apply_success(conversation: &Conversation, final_messages: &[Message]) -> Conversation {
    let mut next = remove_provisional(conversation);
    next.messages.extend(final_messages.iter().cloned());
    next
}

/// Final result of a completed attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalReply {
    /// Submitted text, present when the user message must be synthesized
    pub user_text: Option<String>,
    /// Accumulated assistant text, possibly empty
    pub assistant_text: String,
    pub recommendations: Option<RecommendationPayload>,
}

/// Applies the three cache phases of an attempt and reports failures.
pub struct Reconciler {
    cache: Arc<dyn ConversationCache>,
    notifier: Arc<dyn NotificationSink>,
    placeholder: String,
    failure_title: String,
}

impl Reconciler {
    pub fn new(
        cache: Arc<dyn ConversationCache>,
        notifier: Arc<dyn NotificationSink>,
        config: &StreamConfig,
    ) -> Self {
        Self {
            cache,
            notifier,
            placeholder: config.empty_response_placeholder.clone(),
            failure_title: config.failure_title.clone(),
        }
    }

    /// Pre-flight insert of the provisional user message.
    pub fn preflight(&self, conversation_id: &str, text: &str, at: DateTime<Utc>) -> bool {
        let message = Message::provisional(MessageRole::User, text, at);
        let written = self
            .cache
            .write(conversation_id, &|conv| insert_provisional_user(conv, &message));
        tracing::debug!(conversation_id, written, "Provisional user message inserted");
        written
    }

    /// Terminal success: swap provisional messages for durable ones, then
    /// invalidate the conversation and the list.
    pub fn succeed(&self, conversation_id: &str, reply: FinalReply, at: DateTime<Utc>) -> bool {
        let FinalReply {
            user_text,
            assistant_text,
            recommendations,
        } = reply;

        let mut final_messages = Vec::with_capacity(2);
        if let Some(text) = user_text {
            final_messages.push(Message::new(MessageRole::User, text, at));
        }
        let content = if assistant_text.is_empty() {
            self.placeholder.clone()
        } else {
            assistant_text
        };
        final_messages.push(
            Message::new(MessageRole::Assistant, content, at).with_recommendations(recommendations),
        );

        let written = self
            .cache
            .write(conversation_id, &|conv| apply_success(conv, &final_messages));
        if written {
            self.cache
                .invalidate(CacheScope::Conversation(conversation_id.to_string()));
            self.cache.invalidate(CacheScope::ConversationList);
        }
        tracing::debug!(conversation_id, written, "Reconciled completed attempt");
        written
    }

    /// Terminal failure: remove provisional messages only.
    pub fn rollback(&self, conversation_id: &str) -> bool {
        let written = self.cache.write(conversation_id, &remove_provisional);
        tracing::debug!(conversation_id, written, "Rolled back provisional messages");
        written
    }

    /// Tell the user about a failure. Cancellations are never reported.
    pub fn report_failure(&self, error: &StreamError) {
        if error.is_cancellation() {
            return;
        }
        self.notifier.notify(Notification::error(
            self.failure_title.clone(),
            error.user_message(),
        ));
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("placeholder", &self.placeholder)
            .field("failure_title", &self.failure_title)
            .finish_non_exhaustive()
    }
}
