//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - Streaming HTTP client using reqwest
//! - [`TracingNotifier`] - Notification sink writing to the tracing log
//!
//! The cache adapter lives in [`crate::cache`].
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Scripted response bodies
//! - [`mock::RecordingNotifier`] - Captures notifications

pub mod mock;
pub mod reqwest_http;
pub mod tracing_notifier;

pub use mock::{MockHttpClient, MockResponse, RecordingNotifier};
pub use reqwest_http::ReqwestHttpClient;
pub use tracing_notifier::TracingNotifier;
