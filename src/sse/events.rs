//! Protocol event definitions
//!
//! Contains the [`ProtocolEvent`] enum produced by the interpreter for each
//! `data:` line of the conversation stream.

/// One decoded event from the conversation stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolEvent {
    /// Literal response text to append to the streaming content
    Chunk(String),
    /// JSON-encoded recommendation payload, kept as raw text
    FinalPayload(String),
    /// The response is complete
    Completion,
    /// Backend failure; the message is human-readable
    Error(String),
}

impl ProtocolEvent {
    /// Map a wire `type` tag and its `data` to an event.
    ///
    /// This is the only place wire tags are compared. Unknown tags map to
    /// `None` and are ignored by the caller.
    pub fn from_wire(kind: &str, data: Option<String>) -> Option<Self> {
        let data = data.unwrap_or_default();
        match kind {
            "chunk" => Some(ProtocolEvent::Chunk(data)),
            "json" => Some(ProtocolEvent::FinalPayload(data)),
            "done" => Some(ProtocolEvent::Completion),
            "error" => Some(ProtocolEvent::Error(data)),
            _ => None,
        }
    }

    /// Returns the wire tag of the event for debugging purposes.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            ProtocolEvent::Chunk(_) => "chunk",
            ProtocolEvent::FinalPayload(_) => "json",
            ProtocolEvent::Completion => "done",
            ProtocolEvent::Error(_) => "error",
        }
    }

    /// Whether no further event may follow this one.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProtocolEvent::Completion | ProtocolEvent::Error(_))
    }
}
