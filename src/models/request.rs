use serde::{Deserialize, Serialize};

/// Body of the per-conversation streaming request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamRequest {
    /// The text submitted by the user
    pub content: String,
    /// Ask the backend not to persist the user message (it already exists)
    #[serde(rename = "skipSaveUserMessage")]
    pub skip_save_user_message: bool,
}

impl StreamRequest {
    /// Create a new StreamRequest that lets the backend persist the user message
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            skip_save_user_message: false,
        }
    }

    /// Set whether the backend should skip saving the user message (builder pattern)
    pub fn with_skip_save_user_message(mut self, skip: bool) -> Self {
        self.skip_save_user_message = skip;
        self
    }
}

/// Caller options for a single `send`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Do not insert a provisional user message before streaming.
    /// Use when the user message already exists durably in the cache.
    pub skip_optimistic_insert: bool,
    /// Forwarded to the backend as `skipSaveUserMessage`.
    pub skip_persisting_user_message: bool,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skip_optimistic_insert(mut self, skip: bool) -> Self {
        self.skip_optimistic_insert = skip;
        self
    }

    pub fn with_skip_persisting_user_message(mut self, skip: bool) -> Self {
        self.skip_persisting_user_message = skip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_request_wire_format() {
        let request = StreamRequest::new("Bonjour");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["content"], "Bonjour");
        assert_eq!(json["skipSaveUserMessage"], false);
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_stream_request_skip_save() {
        let request = StreamRequest::new("x").with_skip_save_user_message(true);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"skipSaveUserMessage\":true"));
    }

    #[test]
    fn test_send_options_default() {
        let options = SendOptions::default();
        assert!(!options.skip_optimistic_insert);
        assert!(!options.skip_persisting_user_message);
    }

    #[test]
    fn test_send_options_builder() {
        let options = SendOptions::new()
            .with_skip_optimistic_insert(true)
            .with_skip_persisting_user_message(true);
        assert!(options.skip_optimistic_insert);
        assert!(options.skip_persisting_user_message);
    }
}
