//! Common test utilities for integration tests.
//!
//! This module provides a harness wiring a [`StreamOrchestrator`] to the
//! in-memory store, the scripted HTTP client and a recording notifier.
//!
//! # Example
//!
//! ```ignore
//! use common::{frame, HarnessBuilder};
//!
//! let h = HarnessBuilder::new().with_conversation("c1").build();
//! h.http.push_response(&h.url("c1"), MockResponse::chunks([frame("done", "")]));
//! h.orchestrator.send("c1", "Bonjour", SendOptions::default()).await;
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::sync::{Arc, Once};
use std::time::Duration;

use convo_stream::cache::ConversationStore;
use convo_stream::{Conversation, Message, StreamConfig, StreamOrchestrator};

static TRACING: Once = Once::new();

/// Install a test subscriber once per binary. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Encode one protocol frame as the backend writes it.
pub fn frame(kind: &str, data: &str) -> String {
    format!(
        "data: {}\n\n",
        serde_json::json!({ "type": kind, "data": data })
    )
}

/// Wired-up orchestrator plus handles on its collaborators.
pub struct Harness {
    pub config: StreamConfig,
    pub http: MockHttpClient,
    pub store: Arc<ConversationStore>,
    pub notifier: RecordingNotifier,
    pub orchestrator: Arc<StreamOrchestrator>,
}

impl Harness {
    /// Stream URL of a conversation under the harness config
    pub fn url(&self, conversation_id: &str) -> String {
        self.config.stream_url(conversation_id)
    }

    /// Messages currently cached for a conversation
    pub fn messages(&self, conversation_id: &str) -> Vec<Message> {
        self.store
            .get(conversation_id)
            .map(|conv| conv.messages)
            .unwrap_or_default()
    }

    /// Yield until the mock has seen `count` requests.
    pub async fn wait_for_requests(&self, count: usize) {
        wait_for(|| self.http.request_count() >= count).await;
    }
}

/// Builder for [`Harness`].
#[derive(Default)]
pub struct HarnessBuilder {
    config: Option<StreamConfig>,
    conversations: Vec<Conversation>,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an empty conversation.
    pub fn with_conversation(self, id: &str) -> Self {
        self.with_seeded(Conversation::new(id))
    }

    /// Seed the store with a prepared conversation.
    pub fn with_seeded(mut self, conversation: Conversation) -> Self {
        self.conversations.push(conversation);
        self
    }

    pub fn with_config(mut self, config: StreamConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Harness {
        init_tracing();

        let config = self.config.unwrap_or_default();
        let http = MockHttpClient::new();
        let store = Arc::new(ConversationStore::new());
        for conversation in self.conversations {
            store.insert(conversation);
        }
        let notifier = RecordingNotifier::new();
        let orchestrator = Arc::new(StreamOrchestrator::new(
            config.clone(),
            Arc::new(http.clone()),
            store.clone(),
            Arc::new(notifier.clone()),
        ));

        Harness {
            config,
            http,
            store,
            notifier,
            orchestrator,
        }
    }
}

/// Poll `condition` until it holds, failing the test after two seconds.
pub async fn wait_for(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_format() {
        let encoded = frame("chunk", "Salut");
        let payload = encoded
            .strip_prefix("data: ")
            .and_then(|rest| rest.strip_suffix("\n\n"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(payload).unwrap();
        assert_eq!(value["type"], "chunk");
        assert_eq!(value["data"], "Salut");
    }

    #[test]
    fn test_builder_seeds_store() {
        let h = HarnessBuilder::new().with_conversation("c1").build();
        assert!(h.store.contains("c1"));
        assert_eq!(h.url("c1"), "http://localhost:8000/conversations/c1/stream");
    }
}
