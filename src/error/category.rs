//! Coarse classification of attempt failures.
//!
//! Categories are used as a log field and to decide whether a failed
//! attempt is worth re-sending by the embedding application.

use std::fmt;

/// High-level categorization of stream failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection refused, reset, or timed out before or during streaming.
    Network,

    /// The backend answered with a non-success status or an error frame.
    Server,

    /// The backend sent frames this client could not make sense of.
    Protocol,

    /// The attempt was superseded or cancelled. Never reported to the user.
    Cancelled,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::Cancelled => "cancelled",
        }
    }

    /// Returns a user-friendly description of the category.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Network connectivity issue",
            ErrorCategory::Server => "Server-side issue",
            ErrorCategory::Protocol => "Unexpected response from the server",
            ErrorCategory::Cancelled => "Request cancelled",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
