use serde::{Deserialize, Serialize};

use super::message::Message;

/// A cached conversation document.
///
/// Messages are kept in arrival order and never reordered.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            messages: Vec::new(),
        }
    }

    /// Set the title (builder pattern)
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replace the message list (builder pattern)
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Iterate over messages that are still provisional
    pub fn provisional_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.is_provisional())
    }

    pub fn has_provisional(&self) -> bool {
        self.messages.iter().any(Message::is_provisional)
    }
}
