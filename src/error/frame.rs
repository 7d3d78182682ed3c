//! Errors raised while interpreting a single protocol line.

use thiserror::Error;

/// A line that is valid JSON but does not have the `{type, data}` shape.
///
/// JSON syntax errors are not represented here: those lines are treated as
/// incomplete frames and skipped by the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The frame decoded as JSON but its fields have the wrong types.
    #[error("unexpected frame shape: {0}")]
    UnexpectedShape(String),
}

impl From<serde_json::Error> for FrameError {
    fn from(err: serde_json::Error) -> Self {
        FrameError::UnexpectedShape(err.to_string())
    }
}
