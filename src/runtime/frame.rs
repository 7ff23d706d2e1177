//! Frame codec for the delimiter-based wire format.
//!
//! Requests and responses are arbitrary text separated by a blank line
//! (`\r\n\r\n`). There is no length prefix and no escaping: payload data
//! containing the literal delimiter corrupts framing. This is a known
//! protocol limitation, kept for wire compatibility.

use bytes::{Buf, BytesMut};

/// The 4-byte frame separator shared by requests and responses.
pub const DELIMITER: &[u8] = b"\r\n\r\n";

/// How many bytes a session reads from the socket per `read` call.
pub const RECV_CHUNK: usize = 4096;

/// Accumulates raw bytes from a connection and yields complete frames.
///
/// The buffer only ever holds bytes that are not yet part of a complete
/// frame: each extracted frame removes its prefix (and the delimiter),
/// the remainder is retained for the next round.
pub struct FrameBuffer {
    buf: BytesMut,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(RECV_CHUNK),
        }
    }

    /// Append freshly read bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Extract the next complete frame, if the buffer holds one.
    ///
    /// The frame's payload is decoded as text (invalid UTF-8 is replaced)
    /// and surrounding whitespace is trimmed, matching the request-side
    /// contract of the wire format.
    pub fn next_frame(&mut self) -> Option<String> {
        let pos = find_delimiter(&self.buf)?;
        let frame = self.buf.split_to(pos);
        self.buf.advance(DELIMITER.len());
        Some(String::from_utf8_lossy(&frame).trim().to_string())
    }

    /// Bytes buffered but not yet part of a complete frame.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame an outgoing response by appending the delimiter.
pub fn frame_response(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + DELIMITER.len());
    out.extend_from_slice(text.as_bytes());
    out.extend_from_slice(DELIMITER);
    out
}

/// Find the first delimiter in the buffer.
fn find_delimiter(buf: &[u8]) -> Option<usize> {
    if buf.len() < DELIMITER.len() {
        return None;
    }
    for i in 0..=buf.len() - DELIMITER.len() {
        if &buf[i..i + DELIMITER.len()] == DELIMITER {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame() {
        let mut frames = FrameBuffer::new();
        frames.extend(b"LIST\r\n\r\n");

        assert_eq!(frames.next_frame(), Some("LIST".to_string()));
        assert_eq!(frames.next_frame(), None);
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn test_multiple_frames_in_one_read() {
        let mut frames = FrameBuffer::new();
        frames.extend(b"one\r\n\r\ntwo\r\n\r\nthree\r\n\r\n");

        assert_eq!(frames.next_frame(), Some("one".to_string()));
        assert_eq!(frames.next_frame(), Some("two".to_string()));
        assert_eq!(frames.next_frame(), Some("three".to_string()));
        assert_eq!(frames.next_frame(), None);
    }

    #[test]
    fn test_partial_frame_is_retained() {
        let mut frames = FrameBuffer::new();
        frames.extend(b"GET file");

        assert_eq!(frames.next_frame(), None);
        assert_eq!(frames.pending(), 8);

        frames.extend(b".txt\r\n\r\n");
        assert_eq!(frames.next_frame(), Some("GET file.txt".to_string()));
    }

    #[test]
    fn test_delimiter_split_across_reads() {
        let mut frames = FrameBuffer::new();
        frames.extend(b"LIST\r\n");
        assert_eq!(frames.next_frame(), None);

        frames.extend(b"\r\n");
        assert_eq!(frames.next_frame(), Some("LIST".to_string()));
    }

    #[test]
    fn test_one_byte_at_a_time() {
        let mut frames = FrameBuffer::new();
        for &b in b"UPLOAD_CHUNK f.dat QUFB 0\r\n\r\n" {
            assert_eq!(frames.next_frame(), None);
            frames.extend(&[b]);
        }
        assert_eq!(
            frames.next_frame(),
            Some("UPLOAD_CHUNK f.dat QUFB 0".to_string())
        );
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let mut frames = FrameBuffer::new();
        frames.extend(b"  LIST \r\n\r\n");
        assert_eq!(frames.next_frame(), Some("LIST".to_string()));
    }

    #[test]
    fn test_remainder_kept_after_extraction() {
        let mut frames = FrameBuffer::new();
        frames.extend(b"one\r\n\r\ntw");

        assert_eq!(frames.next_frame(), Some("one".to_string()));
        assert_eq!(frames.pending(), 2);

        frames.extend(b"o\r\n\r\n");
        assert_eq!(frames.next_frame(), Some("two".to_string()));
    }

    #[test]
    fn test_frame_response_appends_delimiter() {
        assert_eq!(frame_response("{\"status\":\"OK\"}"), b"{\"status\":\"OK\"}\r\n\r\n");
    }

    #[test]
    fn test_empty_frame() {
        let mut frames = FrameBuffer::new();
        frames.extend(b"\r\n\r\n");
        assert_eq!(frames.next_frame(), Some(String::new()));
    }
}
