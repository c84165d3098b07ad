//! Chunk-boundary-safe UTF-8 decoding.
//!
//! Raw byte chunks from an arbitrary source (a socket, an HTTP body, a file)
//! can split a multi-byte UTF-8 character across two calls. This adapter
//! carries the incomplete tail of one call over to the next so the tokenizer
//! downstream never sees a torn character, no matter how small the chunks
//! are (down to a single byte at a time).

use crate::error::{EncodingError, ParseError};

/// A maximum of 3 bytes can ever be "pending" — a 4-byte UTF-8 sequence
/// never needs more than 3 bytes carried forward before the 4th completes it.
const MAX_PENDING: usize = 3;

/// Accumulates raw byte chunks and emits complete, valid UTF-8 text.
#[derive(Debug, Default)]
pub struct ChunkAdapter {
    pending: Vec<u8>,
}

impl ChunkAdapter {
    /// Creates a new, empty adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a raw byte chunk, returning the text that is now known to form
    /// complete UTF-8 scalar values. Any trailing incomplete sequence is
    /// held back for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<String, ParseError> {
        let mut buf = std::mem::take(&mut self.pending);
        buf.extend_from_slice(chunk);

        match std::str::from_utf8(&buf) {
            Ok(text) => Ok(text.to_string()),
            Err(err) => {
                let valid_up_to = err.valid_up_to();
                if let Some(invalid_len) = err.error_len() {
                    return Err(ParseError::Encoding(EncodingError::InvalidUtf8 {
                        offset: valid_up_to + invalid_len,
                    }));
                }

                // The tail after `valid_up_to` is an incomplete (not invalid)
                // sequence; carry it forward.
                let tail = &buf[valid_up_to..];
                debug_assert!(tail.len() <= MAX_PENDING);
                // SAFETY-free: valid_up_to is guaranteed to land on a char boundary.
                let text = std::str::from_utf8(&buf[..valid_up_to])
                    .expect("prefix up to valid_up_to is always valid UTF-8")
                    .to_string();
                self.pending = tail.to_vec();
                Ok(text)
            }
        }
    }

    /// Signals end-of-input. Returns an error if bytes are still pending,
    /// since a complete UTF-8 stream can never end mid-sequence.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(ParseError::Encoding(EncodingError::IncompleteSequenceAtEof {
                pending: self.pending.len(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_complete_ascii() {
        let mut adapter = ChunkAdapter::new();
        let out = adapter.feed(b"hello").unwrap();
        assert_eq!(out, "hello");
        adapter.finish().unwrap();
    }

    #[test]
    fn test_feed_splits_multibyte_char_across_chunks() {
        let snowman = "☃".as_bytes(); // 3-byte UTF-8 sequence
        let mut adapter = ChunkAdapter::new();

        let first = adapter.feed(&snowman[..1]).unwrap();
        assert_eq!(first, "");

        let second = adapter.feed(&snowman[1..2]).unwrap();
        assert_eq!(second, "");

        let third = adapter.feed(&snowman[2..]).unwrap();
        assert_eq!(third, "☃");

        adapter.finish().unwrap();
    }

    #[test]
    fn test_feed_byte_at_a_time_four_byte_char() {
        let emoji = "😀".as_bytes(); // 4-byte UTF-8 sequence
        let mut adapter = ChunkAdapter::new();
        let mut collected = String::new();
        for byte in emoji {
            collected.push_str(&adapter.feed(&[*byte]).unwrap());
        }
        assert_eq!(collected, "😀");
    }

    #[test]
    fn test_finish_errors_on_pending_bytes() {
        let snowman = "☃".as_bytes();
        let mut adapter = ChunkAdapter::new();
        adapter.feed(&snowman[..2]).unwrap();
        let err = adapter.finish().unwrap_err();
        assert!(matches!(
            err,
            ParseError::Encoding(EncodingError::IncompleteSequenceAtEof { pending: 2 })
        ));
    }

    #[test]
    fn test_invalid_utf8_errors() {
        let mut adapter = ChunkAdapter::new();
        let err = adapter.feed(&[0xFF, 0xFE]).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Encoding(EncodingError::InvalidUtf8 { .. })
        ));
    }
}
