//! Line reassembly across chunk boundaries.

use tracing::debug;

/// Splits decoded text chunks into complete lines.
///
/// Holds at most one partial line (the carry-over) between calls. Nothing is
/// dropped while feeding; the caller decides what happens to the carry-over
/// when the stream ends.
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    carry: String,
}

impl LineBuffer {
    /// Create an empty line buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every line it completes, in order.
    ///
    /// Lines are returned without their `\n` terminator. Any `\r` is left in
    /// place; the frame parser trims surrounding whitespace.
    pub fn feed(&mut self, chunk: &str) -> Vec<String> {
        if chunk.is_empty() {
            return Vec::new();
        }

        let mut text = std::mem::take(&mut self.carry);
        text.push_str(chunk);

        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        // split always yields at least one segment
        self.carry = lines.pop().unwrap_or_default();
        lines
    }

    /// The retained, not yet terminated fragment.
    pub fn carry_over(&self) -> &str {
        &self.carry
    }

    /// End of stream: discard the carry-over and return it.
    ///
    /// A trailing fragment without a terminator is treated as incomplete.
    pub fn finish(&mut self) -> Option<String> {
        if self.carry.is_empty() {
            return None;
        }
        let fragment = std::mem::take(&mut self.carry);
        debug!(
            bytes = fragment.len(),
            "Discarding unterminated line at end of stream"
        );
        Some(fragment)
    }

    /// Drop any buffered text.
    pub fn clear(&mut self) {
        self.carry.clear();
    }
}
