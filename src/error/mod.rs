//! Error types for the streaming engine.
//!
//! - [`StreamError`] - why an attempt ended without completing
//! - [`FrameError`] - a protocol line with the wrong shape
//! - [`ErrorCategory`] - coarse classification used as a log field
//!
//! Transport errors ([`crate::traits::HttpError`]) live next to the
//! transport trait and are wrapped by `StreamError::Transport`.
//!
//! None of these escape `StreamOrchestrator::send`: failures are reported
//! through the notification sink and the returned
//! [`crate::stream::AttemptOutcome`].

mod category;
mod frame;
mod stream;

pub use category::ErrorCategory;
pub use frame::FrameError;
pub use stream::StreamError;

/// Result type for a single attempt's drain loop.
pub type StreamResult<T> = Result<T, StreamError>;
