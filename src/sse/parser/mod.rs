//! Frame parsing for the conversation stream
//!
//! The response body is a sequence of lines of the form
//! `data: {"type": ..., "data": ...}` each followed by a blank line.
//! Every physical read is decoded and split on its own: a frame that
//! straddles two reads is not reassembled. Its two halves come out as
//! separate lines which the interpreter then drops as incomplete JSON.

use futures_util::StreamExt;

use crate::traits::{ByteStream, HttpError};

/// Prefix every protocol line carries on the wire
pub const DATA_PREFIX: &str = "data: ";

/// Split one physical read into the payloads of its `data: ` lines.
///
/// Bytes are decoded lossily; lines without the prefix (blank separators,
/// comments, fragments of a split frame's tail) are discarded.
pub fn split_frames(chunk: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(chunk)
        .split('\n')
        .filter_map(|line| line.strip_prefix(DATA_PREFIX))
        .map(str::to_string)
        .collect()
}

/// Reads the response body one physical chunk at a time.
///
/// Successive [`next_batch`](FrameReader::next_batch) calls yield the lazy,
/// finite sequence of frame payloads, grouped by the read they came from.
pub struct FrameReader {
    body: ByteStream,
    reads: u64,
}

impl FrameReader {
    /// Wrap a response body
    pub fn new(body: ByteStream) -> Self {
        Self { body, reads: 0 }
    }

    /// Await the next physical read and return its frame payloads in order.
    ///
    /// Returns:
    /// - `Some(Ok(lines))` - one read, possibly with no frame in it
    /// - `Some(Err(error))` - the transport failed mid-body
    /// - `None` - the body ended
    pub async fn next_batch(&mut self) -> Option<Result<Vec<String>, HttpError>> {
        let chunk = self.body.next().await?;
        self.reads += 1;
        Some(chunk.map(|bytes| split_frames(&bytes)))
    }

    /// Number of successful or failed reads so far
    pub fn reads(&self) -> u64 {
        self.reads
    }
}

impl std::fmt::Debug for FrameReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameReader")
            .field("reads", &self.reads)
            .finish_non_exhaustive()
    }
}
