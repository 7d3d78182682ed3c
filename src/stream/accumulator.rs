//! Growing response text of the current attempt.

/// Text buffer holding the concatenation of every chunk received so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentAccumulator {
    buffer: String,
    chunks: usize,
}

impl ContentAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return the full text so far.
    pub fn push(&mut self, chunk: &str) -> &str {
        self.buffer.push_str(chunk);
        self.chunks += 1;
        &self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Take the text out, leaving the accumulator empty.
    pub fn take(&mut self) -> String {
        self.chunks = 0;
        std::mem::take(&mut self.buffer)
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of chunks pushed since the last take
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_concatenates_in_order() {
        let mut acc = ContentAccumulator::new();
        assert_eq!(acc.push("Salut"), "Salut");
        assert_eq!(acc.push(" coach"), "Salut coach");
        assert_eq!(acc.chunk_count(), 2);
    }

    #[test]
    fn test_empty_chunk_counts_but_adds_nothing() {
        let mut acc = ContentAccumulator::new();
        acc.push("");
        assert!(acc.is_empty());
        assert_eq!(acc.chunk_count(), 1);
    }

    #[test]
    fn test_take_resets_chunk_count() {
        let mut acc = ContentAccumulator::new();
        acc.push("abc");
        acc.take();
        assert_eq!(acc.as_str(), "");
        assert_eq!(acc.chunk_count(), 0);
    }

    #[test]
    fn test_take_leaves_empty() {
        let mut acc = ContentAccumulator::new();
        acc.push("abc");
        assert_eq!(acc.take(), "abc");
        assert!(acc.is_empty());
    }
}
