//! Lifecycle of a single send attempt.

use std::fmt;

use crate::error::StreamError;
use crate::models::RecommendationPayload;

use super::accumulator::ContentAccumulator;
use super::cancel::AttemptHandle;

/// Phase of a stream attempt.
///
/// `Idle -> Opening -> Streaming -> {Completed | Cancelled | Errored} -> Idle`.
/// Cancellation and failure may also happen while opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum AttemptPhase {
    #[default]
    Idle,
    Opening,
    Streaming,
    Completed,
    Cancelled,
    Errored,
}

impl AttemptPhase {
    /// Opening or Streaming
    pub fn is_live(&self) -> bool {
        matches!(self, AttemptPhase::Opening | AttemptPhase::Streaming)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AttemptPhase::Completed | AttemptPhase::Cancelled | AttemptPhase::Errored
        )
    }

    pub fn can_transition_to(&self, next: AttemptPhase) -> bool {
        use AttemptPhase::*;
        matches!(
            (self, next),
            (Idle, Opening)
                | (Opening, Streaming)
                | (Opening, Cancelled)
                | (Opening, Errored)
                | (Streaming, Completed)
                | (Streaming, Cancelled)
                | (Streaming, Errored)
                | (Completed, Idle)
                | (Cancelled, Idle)
                | (Errored, Idle)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptPhase::Idle => "idle",
            AttemptPhase::Opening => "opening",
            AttemptPhase::Streaming => "streaming",
            AttemptPhase::Completed => "completed",
            AttemptPhase::Cancelled => "cancelled",
            AttemptPhase::Errored => "errored",
        }
    }
}

impl fmt::Display for AttemptPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a `send` ended.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// Empty conversation id, nothing was attempted
    Skipped,
    /// The stream completed and the cache was reconciled
    Completed,
    /// Cancelled or superseded; the cache was left alone
    Cancelled,
    /// Failed; provisional messages were rolled back and the user notified
    Failed(StreamError),
}

impl AttemptOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, AttemptOutcome::Completed)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AttemptOutcome::Cancelled)
    }

    pub fn error(&self) -> Option<&StreamError> {
        match self {
            AttemptOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Per-attempt working state owned by the orchestrator's `send`.
#[derive(Debug)]
pub struct StreamAttempt {
    conversation_id: String,
    handle: AttemptHandle,
    accumulator: ContentAccumulator,
    phase: AttemptPhase,
    recommendations: Option<RecommendationPayload>,
}

impl StreamAttempt {
    pub fn new(conversation_id: impl Into<String>, handle: AttemptHandle) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            handle,
            accumulator: ContentAccumulator::new(),
            phase: AttemptPhase::Idle,
            recommendations: None,
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn handle(&self) -> &AttemptHandle {
        &self.handle
    }

    pub fn generation(&self) -> u64 {
        self.handle.generation()
    }

    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    /// Move to `next` if the transition is legal. Returns whether it moved.
    pub fn advance(&mut self, next: AttemptPhase) -> bool {
        if !self.phase.can_transition_to(next) {
            tracing::debug!(
                attempt = self.generation(),
                from = %self.phase,
                to = %next,
                "Ignoring illegal phase transition"
            );
            return false;
        }
        tracing::debug!(
            conversation_id = %self.conversation_id,
            attempt = self.generation(),
            from = %self.phase,
            to = %next,
            "Attempt phase changed"
        );
        self.phase = next;
        true
    }

    /// Append chunk text, returning the full content so far.
    pub fn push_chunk(&mut self, text: &str) -> &str {
        self.accumulator.push(text)
    }

    pub fn content(&self) -> &str {
        self.accumulator.as_str()
    }

    /// Chunks received since the attempt started
    pub fn chunk_count(&self) -> usize {
        self.accumulator.chunk_count()
    }

    pub fn take_content(&mut self) -> String {
        self.accumulator.take()
    }

    /// Keep the latest well-shaped recommendation payload.
    pub fn set_recommendations(&mut self, payload: RecommendationPayload) {
        self.recommendations = Some(payload);
    }

    pub fn take_recommendations(&mut self) -> Option<RecommendationPayload> {
        self.recommendations.take()
    }
}
