//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - Streaming client with scripted, queued bodies
//! - [`RecordingNotifier`] - Notification sink that keeps what it receives

pub mod http;
pub mod notifications;

pub use http::{ChunkSender, MockHttpClient, MockResponse, RecordedRequest};
pub use notifications::RecordingNotifier;
