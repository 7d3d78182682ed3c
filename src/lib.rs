//! convo-stream - streaming reply synchronization for conversational clients
//!
//! Opens a streamed reply for a message sent into a conversation, decodes
//! its frames, publishes the partial text, and keeps a shared conversation
//! cache consistent through optimistic insert, final swap and rollback.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod sse;
pub mod stream;
pub mod traits;

pub use config::StreamConfig;
pub use error::{ErrorCategory, StreamError};
pub use models::{Conversation, Message, MessageRole, RecommendationPayload, SendOptions};
pub use stream::{AttemptOutcome, AttemptPhase, StreamOrchestrator};
