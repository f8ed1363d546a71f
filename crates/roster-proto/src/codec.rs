//! Line-based codec for tokio.
//!
//! Frames newline-terminated wire traffic into one line per item, with
//! line endings stripped so downstream parsing never sees them. Lines
//! stay raw bytes; IRC gives no encoding guarantee.

use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::CodecError;

/// Line-based codec that handles newline-terminated messages.
///
/// By default, lines are limited to 512 bytes (IRC standard).
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
}

impl LineCodec {
    /// Create a new codec with the default 512-byte line limit.
    pub fn new() -> Self {
        Self {
            next_index: 0,
            max_len: 512,
        }
    }

    /// Create a new codec with a custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = Bytes;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>, CodecError> {
        // Look for newline starting from where we left off
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            // Found a line - extract it
            let mut line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            // Check length limit
            if line.len() > self.max_len {
                return Err(CodecError::LineTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            // Strip the line ending; the parser never sees it
            while line.last() == Some(&b'\n') || line.last() == Some(&b'\r') {
                line.truncate(line.len() - 1);
            }

            Ok(Some(line.freeze()))
        } else {
            // No complete line yet - remember where we stopped
            self.next_index = src.len();

            // Check if partial line already exceeds limit
            if src.len() > self.max_len {
                return Err(CodecError::LineTooLong {
                    actual: src.len(),
                    limit: self.max_len,
                });
            }

            Ok(None)
        }
    }
}

impl Encoder<Bytes> for LineCodec {
    type Error = CodecError;

    fn encode(&mut self, line: Bytes, dst: &mut BytesMut) -> Result<(), CodecError> {
        dst.reserve(line.len() + 2);
        dst.put_slice(&line);
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_complete_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PING :test\r\n"[..]);

        let result = codec.decode(&mut buf).unwrap();
        assert_eq!(result.as_deref(), Some(&b"PING :test"[..]));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_partial_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PING :"[..]);

        let result = codec.decode(&mut buf).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_decode_bare_newline_ending() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PING :test\n"[..]);

        let result = codec.decode(&mut buf).unwrap();
        assert_eq!(result.as_deref(), Some(&b"PING :test"[..]));
    }

    #[test]
    fn test_decode_two_lines() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PING :a\r\nPING :b\r\n"[..]);

        assert_eq!(
            codec.decode(&mut buf).unwrap().as_deref(),
            Some(&b"PING :a"[..])
        );
        assert_eq!(
            codec.decode(&mut buf).unwrap().as_deref(),
            Some(&b"PING :b"[..])
        );
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_decode_too_long() {
        let mut codec = LineCodec::with_max_len(10);
        let mut buf = BytesMut::from(&b"this is way too long\n"[..]);

        let result = codec.decode(&mut buf);
        assert!(matches!(result, Err(CodecError::LineTooLong { .. })));
    }

    #[test]
    fn test_encode_appends_crlf() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        codec
            .encode(Bytes::from_static(b"PONG :test"), &mut buf)
            .unwrap();
        assert_eq!(&buf[..], b"PONG :test\r\n");
    }
}
