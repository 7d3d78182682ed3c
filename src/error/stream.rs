//! Failure modes of a single streaming attempt.
//!
//! Every path out of an attempt other than a clean completion ends up as a
//! `StreamError`. The orchestrator inspects it to pick the terminal
//! reconciliation: [`StreamError::Cancelled`] leaves the cache alone, every
//! other variant rolls back provisional messages and notifies the user.

use std::fmt;

use super::category::ErrorCategory;
use super::frame::FrameError;
use crate::traits::HttpError;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// Opening the request or reading its body failed.
    Transport(HttpError),

    /// Backend reported an error via an `error` frame.
    Backend { message: String },

    /// A frame decoded as JSON but had the wrong shape.
    MalformedFrame(FrameError),

    /// The body ended before a `done` frame arrived.
    Incomplete,

    /// The attempt was superseded, cancelled, or torn down.
    Cancelled,
}

impl StreamError {
    /// Whether this is a cancellation signal rather than a genuine failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            StreamError::Cancelled | StreamError::Transport(HttpError::Cancelled)
        )
    }

    /// Classify the error for logging and retry decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            _ if self.is_cancellation() => ErrorCategory::Cancelled,
            StreamError::Transport(HttpError::ServerError { .. }) => ErrorCategory::Server,
            StreamError::Transport(_) => ErrorCategory::Network,
            StreamError::Backend { .. } => ErrorCategory::Server,
            StreamError::MalformedFrame(_) => ErrorCategory::Protocol,
            StreamError::Incomplete => ErrorCategory::Network,
            StreamError::Cancelled => ErrorCategory::Cancelled,
        }
    }

    /// Get a user-friendly error message.
    ///
    /// Backend error frames already carry a human-readable message, which is
    /// passed through unchanged.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::Transport(HttpError::ServerError { status, .. }) => {
                format!("The server could not process the request (HTTP {}).", status)
            }
            StreamError::Transport(HttpError::Timeout(_)) => {
                "The server took too long to respond. Please try again.".to_string()
            }
            StreamError::Transport(HttpError::Cancelled) => "Request cancelled.".to_string(),
            StreamError::Transport(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            StreamError::Backend { message } => message.clone(),
            StreamError::MalformedFrame(_) => {
                "Received invalid data from server. Please try again.".to_string()
            }
            StreamError::Incomplete => {
                "The response was interrupted before it finished. Please try again.".to_string()
            }
            StreamError::Cancelled => "Request cancelled.".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Transport(HttpError::ServerError { .. }) => "E_STREAM_STATUS",
            StreamError::Transport(HttpError::Cancelled) => "E_STREAM_CANCELLED",
            StreamError::Transport(_) => "E_STREAM_TRANSPORT",
            StreamError::Backend { .. } => "E_STREAM_BACKEND",
            StreamError::MalformedFrame(_) => "E_STREAM_FRAME",
            StreamError::Incomplete => "E_STREAM_INCOMPLETE",
            StreamError::Cancelled => "E_STREAM_CANCELLED",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Transport(err) => write!(f, "Stream transport failed: {}", err),
            StreamError::Backend { message } => write!(f, "Backend error: {}", message),
            StreamError::MalformedFrame(err) => write!(f, "Malformed frame: {}", err),
            StreamError::Incomplete => write!(f, "Stream ended before completion"),
            StreamError::Cancelled => write!(f, "Stream cancelled"),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Transport(err) => Some(err),
            StreamError::MalformedFrame(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HttpError> for StreamError {
    fn from(err: HttpError) -> Self {
        StreamError::Transport(err)
    }
}

impl From<FrameError> for StreamError {
    fn from(err: FrameError) -> Self {
        StreamError::MalformedFrame(err)
    }
}
