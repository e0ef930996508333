//! Incremental UTF-8 decoding for chunked response bodies.
//!
//! Network chunks can split a multi-byte character anywhere. The decoder
//! holds the incomplete tail of one chunk and completes it with the head of
//! the next, so the line buffer downstream only ever sees whole characters.

/// Stateful UTF-8 decoder that carries split multi-byte sequences.
#[derive(Debug, Default, Clone)]
pub struct Utf8StreamDecoder {
    /// Bytes of an incomplete trailing sequence (at most 3)
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    /// Create a new decoder with no pending bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk, returning all text that is complete so far.
    ///
    /// Invalid sequences are replaced with U+FFFD. A sequence that is merely
    /// truncated at the end of the chunk is kept for the next call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    // from_utf8 guarantees the prefix is valid
                    if let Ok(valid) = std::str::from_utf8(&rest[..valid_up_to]) {
                        out.push_str(valid);
                    }
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &rest[valid_up_to + len..];
                        }
                        None => {
                            self.pending = rest[valid_up_to..].to_vec();
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Whether an incomplete sequence is waiting for more bytes.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Flush at end of stream. A dangling partial sequence becomes U+FFFD.
    pub fn finish(&mut self) -> String {
        let pending = std::mem::take(&mut self.pending);
        if pending.is_empty() {
            String::new()
        } else {
            String::from_utf8_lossy(&pending).into_owned()
        }
    }
}
