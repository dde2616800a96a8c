//! Record variants and the incremental feed state machine.
//!
//! A record is built in pieces: the factory parses its header, then raw
//! bytes are fed in as the transport delivers them. Feeding fills
//! content first, then swallows padding, and reports completion the
//! instant both are satisfied. Surplus bytes belong to the next record
//! and are never consumed.
//!
//! Record kinds form a closed tagged enum ([`Record`]) rather than an
//! open class hierarchy: [`ParamsRecord`] carries the name/value-pair
//! sub-encoding, every other assigned type is a [`StreamRecord`], and
//! unassigned type bytes land in [`UnknownRecord`].

use bytes::Bytes;

use super::body::RecordBody;
use super::wire_format::{Header, RecordType, MAX_CONTENT_LENGTH};
use crate::error::{FcgiError, Result};
use crate::params::ParamsRecord;

/// Outcome of feeding bytes into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// The record needs more bytes; everything supplied was consumed.
    Incomplete,
    /// The record is complete. `last_consumed` is the index of the last
    /// byte used from the supplied slice; anything after it belongs to
    /// the next record.
    Complete { last_consumed: usize },
}

/// Shared framing state: header, accumulated content, and how much
/// content/padding is still owed.
#[derive(Debug)]
pub(crate) struct RecordFrame {
    pub(crate) header: Header,
    pub(crate) body: RecordBody,
    content_remaining: usize,
    padding_remaining: usize,
}

impl RecordFrame {
    pub(crate) fn from_header(header: Header) -> Self {
        Self {
            header,
            body: RecordBody::with_capacity(header.content_length as usize),
            content_remaining: header.content_length as usize,
            padding_remaining: header.padding_length as usize,
        }
    }

    /// A frame for the encoder path: no bytes owed, content added later.
    pub(crate) fn empty(record_type: RecordType, request_id: u16) -> Self {
        Self::from_header(Header::with_padding(record_type, request_id, 0, 0))
    }

    #[inline]
    pub(crate) fn is_complete(&self) -> bool {
        self.content_remaining == 0 && self.padding_remaining == 0
    }

    /// Consume content-remaining, then padding-remaining, from `data`.
    /// Padding bytes are discarded, not stored.
    ///
    /// Feeding a complete record is a caller-contract violation; the
    /// reassembly engine never does it. Debug builds assert, release
    /// builds consume nothing.
    pub(crate) fn feed(&mut self, data: &[u8]) -> FeedOutcome {
        debug_assert!(!self.is_complete(), "feed on a complete record");
        if data.is_empty() || self.is_complete() {
            return FeedOutcome::Incomplete;
        }

        let content_take = data.len().min(self.content_remaining);
        self.body.write(&data[..content_take]);
        self.content_remaining -= content_take;
        let mut used = content_take;

        if self.content_remaining == 0 {
            let padding_take = (data.len() - used).min(self.padding_remaining);
            self.padding_remaining -= padding_take;
            used += padding_take;
        }

        if self.is_complete() {
            FeedOutcome::Complete {
                last_consumed: used - 1,
            }
        } else {
            FeedOutcome::Incomplete
        }
    }
}

/// A record whose content is an opaque byte stream (stdin, stdout,
/// stderr, data, and the management types).
#[derive(Debug)]
pub struct StreamRecord {
    frame: RecordFrame,
}

impl StreamRecord {
    pub(crate) fn from_header(header: Header) -> Self {
        Self {
            frame: RecordFrame::from_header(header),
        }
    }

    /// Header of this record.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.frame.header
    }

    /// Content accumulated so far (all of it, once complete).
    #[inline]
    pub fn content(&self) -> &[u8] {
        self.frame.body.as_slice()
    }

    /// Take the content as a shareable `Bytes` handle.
    pub fn into_content(self) -> Bytes {
        self.frame.body.into_bytes()
    }
}

/// A record with a type byte the protocol does not assign. Content is
/// kept verbatim so callers can decide what to do with it.
#[derive(Debug)]
pub struct UnknownRecord {
    frame: RecordFrame,
}

impl UnknownRecord {
    pub(crate) fn from_header(header: Header) -> Self {
        Self {
            frame: RecordFrame::from_header(header),
        }
    }

    /// Header of this record.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.frame.header
    }

    /// The unrecognized wire type byte.
    pub fn type_byte(&self) -> u8 {
        self.frame.header.record_type.to_byte()
    }

    /// Content accumulated so far.
    #[inline]
    pub fn content(&self) -> &[u8] {
        self.frame.body.as_slice()
    }
}

/// One framed unit of the protocol, tagged by record kind.
#[derive(Debug)]
pub enum Record {
    /// A Params record; content decodes as name/value pairs.
    Params(ParamsRecord),
    /// Any other assigned record type; content is opaque bytes.
    Stream(StreamRecord),
    /// A record with an unassigned type byte.
    Unknown(UnknownRecord),
}

impl Record {
    pub(crate) fn frame(&self) -> &RecordFrame {
        match self {
            Record::Params(rec) => rec.frame(),
            Record::Stream(rec) => &rec.frame,
            Record::Unknown(rec) => &rec.frame,
        }
    }

    fn frame_mut(&mut self) -> &mut RecordFrame {
        match self {
            Record::Params(rec) => rec.frame_mut(),
            Record::Stream(rec) => &mut rec.frame,
            Record::Unknown(rec) => &mut rec.frame,
        }
    }

    /// Header of this record.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.frame().header
    }

    /// Record type from the header.
    #[inline]
    pub fn record_type(&self) -> RecordType {
        self.header().record_type
    }

    /// Request ID from the header.
    #[inline]
    pub fn request_id(&self) -> u16 {
        self.header().request_id
    }

    /// Declared content length from the header.
    #[inline]
    pub fn content_length(&self) -> u16 {
        self.header().content_length
    }

    /// Content accumulated so far (all of it, once complete).
    #[inline]
    pub fn content(&self) -> &[u8] {
        self.frame().body.as_slice()
    }

    /// Whether content and padding have both been fully supplied.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.frame().is_complete()
    }

    /// Feed raw bytes into this record. See [`FeedOutcome`].
    ///
    /// Must not be called once [`Record::is_complete`] returns true;
    /// the reassembly engine upholds this.
    pub fn feed(&mut self, data: &[u8]) -> FeedOutcome {
        self.frame_mut().feed(data)
    }

    /// Unwrap a Params record, if that is what this is.
    pub fn into_params(self) -> Option<ParamsRecord> {
        match self {
            Record::Params(rec) => Some(rec),
            _ => None,
        }
    }
}

/// Build a complete wire record as a single byte vector.
///
/// Encodes a header with padding to the next 8-byte boundary, then
/// appends the content and zero padding. This is the send-path
/// counterpart of the reassembly engine.
///
/// # Errors
///
/// Returns [`FcgiError::OversizedContent`] if `content` exceeds the
/// 16-bit content length limit.
///
/// # Example
///
/// ```
/// use fcgi_wire::protocol::{build_record, RecordType, HEADER_SIZE};
///
/// let bytes = build_record(RecordType::Stdin, 1, b"hello").unwrap();
/// assert_eq!(bytes.len(), HEADER_SIZE + 5 + 3); // content padded to 8
/// ```
pub fn build_record(record_type: RecordType, request_id: u16, content: &[u8]) -> Result<Vec<u8>> {
    if content.len() > MAX_CONTENT_LENGTH {
        return Err(FcgiError::OversizedContent { len: content.len() });
    }
    let header = Header::new(record_type, request_id, content.len() as u16);
    let mut buf = Vec::with_capacity(header.total_len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(content);
    buf.resize(header.total_len(), 0);
    Ok(buf)
}
