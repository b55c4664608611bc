// src/core/protocol/reassembler.rs

//! Reassembles complete protocol lines from text chunks of arbitrary size.
//!
//! Transports give no guarantee that a chunk ends on a line boundary, so the
//! trailing fragment of every chunk is carried forward and prepended to the next.

const LINE_TERMINATOR: char = '\n';

/// Buffers the partial tail of the last chunk and yields every completed line exactly once.
#[derive(Debug, Default)]
pub struct LineReassembler {
    /// Never contains a line terminator.
    pending: String,
}

impl LineReassembler {
    pub fn new() -> Self {
        Default::default()
    }

    /// Feeds one chunk and returns the lines it completed, in order, without terminators.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        let Some(last_terminator) = chunk.rfind(LINE_TERMINATOR) else {
            self.pending.push_str(chunk);
            return Vec::new();
        };

        let mut text = std::mem::take(&mut self.pending);
        text.push_str(&chunk[..last_terminator]);
        self.pending.push_str(&chunk[last_terminator + 1..]);

        text.split(LINE_TERMINATOR).map(str::to_string).collect()
    }

    /// The fragment still waiting for its terminator.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Drops any buffered fragment, e.g. after the connection is torn down.
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}
