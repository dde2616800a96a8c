//! Record body container.
//!
//! An append-only buffer holding one record's content, with a read
//! cursor that rewinds independently of the append position. Content
//! arrives in fragments (socket reads rarely align with record
//! boundaries), so writes of any size are accepted and the buffer grows
//! as needed. Consumers may traverse the content any number of times by
//! rewinding; the buffer has a single owner, so rewinding is just
//! resetting an index.
//!
//! Uses `bytes::BytesMut` for storage so a completed body can be frozen
//! into a cheap, shareable `Bytes` handle.

use bytes::{Bytes, BytesMut};

/// Append-only byte buffer with an independent read cursor.
#[derive(Debug, Default)]
pub struct RecordBody {
    buf: BytesMut,
    cursor: usize,
}

impl RecordBody {
    /// Create an empty body.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
            cursor: 0,
        }
    }

    /// Create an empty body pre-sized for `capacity` bytes.
    ///
    /// The reassembly engine sizes bodies to the header's declared
    /// content length so fragment writes never reallocate.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            cursor: 0,
        }
    }

    /// Append bytes at the write position. Fragments of any size are fine.
    pub fn write(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Number of content bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if no content has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Reset the read cursor to the start of the content.
    #[inline]
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Current read cursor position.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bytes left between the read cursor and the end of content.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.cursor
    }

    /// Look at the byte under the read cursor without consuming it.
    pub fn peek_u8(&self) -> Option<u8> {
        self.buf.get(self.cursor).copied()
    }

    /// Consume and return one byte, or `None` at end of content.
    pub fn read_u8(&mut self) -> Option<u8> {
        let byte = self.peek_u8()?;
        self.cursor += 1;
        Some(byte)
    }

    /// Consume and return the next `n` bytes, or `None` if fewer remain.
    pub fn read_slice(&mut self, n: usize) -> Option<&[u8]> {
        if self.remaining() < n {
            return None;
        }
        let start = self.cursor;
        self.cursor += n;
        Some(&self.buf[start..start + n])
    }

    /// The whole content, independent of the read cursor.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Freeze the content into a shareable `Bytes` handle.
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragmented_writes_accumulate() {
        let mut body = RecordBody::with_capacity(4);
        body.write(b"ab");
        body.write(b"");
        body.write(b"cdef"); // grows past the pre-size
        assert_eq!(body.len(), 6);
        assert_eq!(body.as_slice(), b"abcdef");
    }

    #[test]
    fn test_cursor_reads_and_rewind() {
        let mut body = RecordBody::new();
        body.write(b"hello");

        assert_eq!(body.read_u8(), Some(b'h'));
        assert_eq!(body.read_slice(3), Some(&b"ell"[..]));
        assert_eq!(body.remaining(), 1);

        body.rewind();
        assert_eq!(body.position(), 0);
        assert_eq!(body.read_slice(5), Some(&b"hello"[..]));
        assert_eq!(body.read_u8(), None);
    }

    #[test]
    fn test_read_past_end_returns_none() {
        let mut body = RecordBody::new();
        body.write(b"ab");
        assert!(body.read_slice(3).is_none());
        // A failed read consumes nothing.
        assert_eq!(body.remaining(), 2);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut body = RecordBody::new();
        body.write(b"x");
        assert_eq!(body.peek_u8(), Some(b'x'));
        assert_eq!(body.peek_u8(), Some(b'x'));
        assert_eq!(body.read_u8(), Some(b'x'));
        assert_eq!(body.peek_u8(), None);
    }

    #[test]
    fn test_write_after_read_keeps_cursor() {
        let mut body = RecordBody::new();
        body.write(b"ab");
        body.read_u8();
        body.write(b"cd");
        assert_eq!(body.position(), 1);
        assert_eq!(body.read_slice(3), Some(&b"bcd"[..]));
    }

    #[test]
    fn test_into_bytes() {
        let mut body = RecordBody::new();
        body.write(b"payload");
        let bytes = body.into_bytes();
        assert_eq!(&bytes[..], b"payload");
    }
}
