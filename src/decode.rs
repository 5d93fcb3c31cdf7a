//! Incremental UTF-8 decoding for network chunks.
//!
//! The HTTP layer hands the stream back as raw byte chunks whose
//! boundaries fall anywhere, including inside a multi-byte character.
//! [`Utf8Decoder`] carries the incomplete tail bytes from one chunk to
//! the next so the rest of the pipeline only ever sees whole characters.

use crate::error::Error;

/// Stateful decoder that turns a sequence of byte chunks into a sequence
/// of string fragments.
///
/// An incomplete trailing character (at most 3 bytes) is held back and
/// prepended to the next chunk. Bytes that can never begin or continue a
/// valid character are a hard error: truncation is expected mid-stream,
/// corruption is not.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk, returning the longest valid prefix of the
    /// carried bytes plus this chunk. The returned string may be empty
    /// when the chunk only extends an incomplete character.
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String, Error> {
        if chunk.is_empty() && self.pending.is_empty() {
            return Ok(String::new());
        }
        if !self.pending.is_empty() {
            self.pending.extend_from_slice(chunk);
        }
        let buf = if self.pending.is_empty() {
            chunk
        } else {
            self.pending.as_slice()
        };

        match std::str::from_utf8(buf) {
            Ok(text) => {
                let text = text.to_string();
                self.pending.clear();
                Ok(text)
            }
            // error_len() is None exactly when the error is an unexpected
            // end of input, i.e. a character split by the chunk boundary.
            Err(err) if err.error_len().is_none() => {
                let valid = err.valid_up_to();
                let text = String::from_utf8_lossy(&buf[..valid]).into_owned();
                let tail = buf[valid..].to_vec();
                self.pending = tail;
                Ok(text)
            }
            Err(_) => Err(Error::InvalidUtf8),
        }
    }

    /// Consume the decoder at end of stream, returning how many carried
    /// bytes never completed a character.
    pub fn finish(self) -> usize {
        self.pending.len()
    }
}
