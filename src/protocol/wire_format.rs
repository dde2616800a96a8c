//! Wire format encoding and decoding.
//!
//! Implements the 8-byte FastCGI record header:
//! ```text
//! ┌─────────┬──────┬──────────┬──────────────┬─────────┬──────────┐
//! │ Version │ Type │ Req ID   │ Content Len  │ Padding │ Reserved │
//! │ 1 byte  │1 byte│ 2 bytes  │ 2 bytes      │ 1 byte  │ 1 byte   │
//! │ = 1     │ enum │ uint16 BE│ uint16 BE    │ uint8   │ ignored  │
//! └─────────┴──────┴──────────┴──────────────┴─────────┴──────────┘
//! ```
//!
//! All multi-byte integers are Big Endian. `content_length` bytes of
//! content followed by `padding_length` bytes of padding come after
//! the header on the wire.

use crate::error::{FcgiError, Result};

/// Header size in bytes (fixed, exactly 8).
pub const HEADER_SIZE: usize = 8;

/// The only protocol version this crate speaks (FCGI_VERSION_1).
pub const FCGI_VERSION: u8 = 1;

/// Maximum record content length (16-bit length field).
pub const MAX_CONTENT_LENGTH: usize = u16::MAX as usize;

/// Padding needed to align `content_length` bytes to an 8-byte boundary.
///
/// The protocol does not require aligned records, but senders
/// conventionally pad to 8 bytes; this is the rule used by
/// [`build_record`](crate::protocol::build_record).
#[inline]
pub fn padding_for(content_length: u16) -> u8 {
    let rem = (content_length % 8) as u8;
    if rem == 0 {
        0
    } else {
        8 - rem
    }
}

/// FastCGI record types (FCGI_BEGIN_REQUEST .. FCGI_UNKNOWN_TYPE).
///
/// Type bytes outside the assigned range map to [`RecordType::Unknown`],
/// so `u8` round-trips losslessly through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    BeginRequest,
    AbortRequest,
    EndRequest,
    Params,
    Stdin,
    Stdout,
    Stderr,
    Data,
    GetValues,
    GetValuesResult,
    UnknownType,
    /// A type byte not assigned by the protocol.
    Unknown(u8),
}

impl RecordType {
    /// Map a wire type byte to a record type. Total: unassigned bytes
    /// become [`RecordType::Unknown`].
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            1 => RecordType::BeginRequest,
            2 => RecordType::AbortRequest,
            3 => RecordType::EndRequest,
            4 => RecordType::Params,
            5 => RecordType::Stdin,
            6 => RecordType::Stdout,
            7 => RecordType::Stderr,
            8 => RecordType::Data,
            9 => RecordType::GetValues,
            10 => RecordType::GetValuesResult,
            11 => RecordType::UnknownType,
            other => RecordType::Unknown(other),
        }
    }

    /// The wire byte for this record type.
    pub fn to_byte(self) -> u8 {
        match self {
            RecordType::BeginRequest => 1,
            RecordType::AbortRequest => 2,
            RecordType::EndRequest => 3,
            RecordType::Params => 4,
            RecordType::Stdin => 5,
            RecordType::Stdout => 6,
            RecordType::Stderr => 7,
            RecordType::Data => 8,
            RecordType::GetValues => 9,
            RecordType::GetValuesResult => 10,
            RecordType::UnknownType => 11,
            RecordType::Unknown(byte) => byte,
        }
    }
}

/// Decoded record header.
///
/// The version byte is not stored: [`Header::decode`] rejects anything
/// other than [`FCGI_VERSION`] and [`Header::encode`] always writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Record type (see [`RecordType`]).
    pub record_type: RecordType,
    /// Request identifier, the protocol's multiplexing key.
    pub request_id: u16,
    /// Content length in bytes (0-65535).
    pub content_length: u16,
    /// Padding length in bytes (0-255); padding carries no payload.
    pub padding_length: u8,
}

impl Header {
    /// Create a header with padding chosen to align content to 8 bytes.
    pub fn new(record_type: RecordType, request_id: u16, content_length: u16) -> Self {
        Self {
            record_type,
            request_id,
            content_length,
            padding_length: padding_for(content_length),
        }
    }

    /// Create a header with an explicit padding length.
    pub fn with_padding(
        record_type: RecordType,
        request_id: u16,
        content_length: u16,
        padding_length: u8,
    ) -> Self {
        Self {
            record_type,
            request_id,
            content_length,
            padding_length,
        }
    }

    /// Encode header to bytes (Big Endian).
    ///
    /// # Example
    ///
    /// ```
    /// use fcgi_wire::protocol::{Header, RecordType};
    ///
    /// let header = Header::new(RecordType::Params, 1, 16);
    /// let bytes = header.encode();
    /// assert_eq!(bytes.len(), 8);
    /// assert_eq!(bytes[0], 1); // version
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        self.encode_into(&mut buf);
        buf
    }

    /// Encode header into an existing buffer.
    ///
    /// # Panics
    ///
    /// Panics if buffer is smaller than `HEADER_SIZE` (8 bytes).
    pub fn encode_into(&self, buf: &mut [u8]) {
        debug_assert!(buf.len() >= HEADER_SIZE);
        buf[0] = FCGI_VERSION;
        buf[1] = self.record_type.to_byte();
        buf[2..4].copy_from_slice(&self.request_id.to_be_bytes());
        buf[4..6].copy_from_slice(&self.content_length.to_be_bytes());
        buf[6] = self.padding_length;
        buf[7] = 0; // reserved
    }

    /// Decode header from bytes (Big Endian).
    ///
    /// # Errors
    ///
    /// Returns [`FcgiError::MalformedHeader`] if fewer than 8 bytes are
    /// supplied or the version byte is not [`FCGI_VERSION`].
    ///
    /// # Example
    ///
    /// ```
    /// use fcgi_wire::protocol::{Header, RecordType};
    ///
    /// let bytes = [1, 4, 0, 1, 0, 16, 0, 0];
    /// let header = Header::decode(&bytes).unwrap();
    /// assert_eq!(header.record_type, RecordType::Params);
    /// assert_eq!(header.request_id, 1);
    /// assert_eq!(header.content_length, 16);
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(FcgiError::MalformedHeader {
                reason: format!("need {} bytes, got {}", HEADER_SIZE, buf.len()),
            });
        }
        if buf[0] != FCGI_VERSION {
            return Err(FcgiError::MalformedHeader {
                reason: format!("unsupported protocol version {}", buf[0]),
            });
        }
        Ok(Self {
            record_type: RecordType::from_byte(buf[1]),
            request_id: u16::from_be_bytes([buf[2], buf[3]]),
            content_length: u16::from_be_bytes([buf[4], buf[5]]),
            padding_length: buf[6],
        })
    }

    /// Bytes that must follow the header on the wire (content + padding).
    #[inline]
    pub fn body_len(&self) -> usize {
        self.content_length as usize + self.padding_length as usize
    }

    /// Total wire size of the record (header + content + padding).
    #[inline]
    pub fn total_len(&self) -> usize {
        HEADER_SIZE + self.body_len()
    }
}
