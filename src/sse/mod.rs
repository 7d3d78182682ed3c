//! Conversation stream decoding
//!
//! The backend answers a send with a newline-delimited event stream:
//! - `data: {"type": "chunk", "data": "..."}` - response text
//! - `data: {"type": "json", "data": "..."}` - JSON-encoded recommendations
//! - `data: {"type": "done", "data": ""}` - completion
//! - `data: {"type": "error", "data": "..."}` - failure message
//! - Empty line - separates frames
//!
//! # Module structure
//! - `events` - The [`ProtocolEvent`] enum
//! - `payloads` - Internal wire deserialization structs
//! - `parser` - Byte stream to frame payloads ([`FrameReader`])
//! - `interpreter` - Frame payload to event ([`interpret_line`])

mod events;
mod interpreter;
mod parser;
mod payloads;

pub use events::ProtocolEvent;
pub use interpreter::interpret_line;
pub use parser::{split_frames, FrameReader, DATA_PREFIX};
