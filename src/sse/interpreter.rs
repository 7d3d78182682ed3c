//! Line-level interpretation of the conversation stream
//!
//! Turns one raw `data:` payload into a [`ProtocolEvent`].

use crate::error::FrameError;
use crate::sse::events::ProtocolEvent;
use crate::sse::payloads::WireFrame;

/// Interpret one raw line (prefix already stripped).
///
/// Returns:
/// - `Ok(Some(event))` - the line mapped to an event
/// - `Ok(None)` - the line should be skipped: either its tag is unknown or
///   it is not syntactically complete JSON. The frame reader does not
///   reassemble frames split across reads, so an incomplete line is
///   expected here and is dropped without failing the attempt.
/// - `Err(error)` - valid JSON with the wrong shape; fatal to the attempt
pub fn interpret_line(line: &str) -> Result<Option<ProtocolEvent>, FrameError> {
    let frame: WireFrame = match serde_json::from_str(line) {
        Ok(frame) => frame,
        Err(err) if err.is_syntax() || err.is_eof() => {
            tracing::warn!(error = %err, len = line.len(), "Skipping incomplete frame");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    let event = ProtocolEvent::from_wire(&frame.kind, frame.data);
    if event.is_none() {
        tracing::debug!(kind = %frame.kind, "Ignoring unknown frame type");
    }
    Ok(event)
}
