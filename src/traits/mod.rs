//! Trait abstractions for the engine's collaborators.
//!
//! The engine never talks to the network, the cache, or the user directly;
//! each is injected behind one of these traits so tests can substitute
//! scripted implementations.
//!
//! # Traits
//!
//! - [`HttpClient`] - Streaming POST transport
//! - [`ConversationCache`] - Shared conversation cache with atomic reducers
//! - [`NotificationSink`] - User-facing failure reports

pub mod cache;
pub mod http;
pub mod notifications;

pub use cache::{CacheScope, ConversationCache, Reducer};
pub use http::{ByteStream, Headers, HttpClient, HttpError};
pub use notifications::{Notification, NotificationSink, Severity};
