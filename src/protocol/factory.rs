//! Record factory: header bytes in, pre-sized record variant out.
//!
//! Given at least one full header's worth of bytes, decodes the header,
//! selects the record variant by type byte, and immediately feeds any
//! bytes beyond the header into the new record. Header parsing never
//! needs incremental state because the reassembly engine only invokes
//! the factory once 8 bytes are certainly available.

use super::record::{FeedOutcome, Record, StreamRecord, UnknownRecord};
use super::wire_format::{Header, RecordType, HEADER_SIZE};
use crate::error::{FcgiError, Result};
use crate::params::ParamsRecord;

/// Builds record variants from raw header bytes.
#[derive(Debug, Default)]
pub struct RecordFactory;

impl RecordFactory {
    /// Create a new factory.
    pub fn new() -> Self {
        Self
    }

    /// Decode the header at the start of `buf`, construct the matching
    /// record variant pre-sized to its content length, and feed
    /// `buf[8..]` into it.
    ///
    /// The returned [`FeedOutcome::Complete`] index counts from the
    /// start of `buf`, header included: a record with zero content and
    /// zero padding completes at index 7.
    ///
    /// # Errors
    ///
    /// - [`FcgiError::InsufficientHeaderBytes`] if `buf.len() < 8`. The
    ///   reassembly engine guarantees this precondition; hitting it
    ///   means the factory was called directly with too few bytes.
    /// - [`FcgiError::MalformedHeader`] if the version byte is wrong.
    pub fn create_from_header(&self, buf: &[u8]) -> Result<(Record, FeedOutcome)> {
        if buf.len() < HEADER_SIZE {
            return Err(FcgiError::InsufficientHeaderBytes {
                available: buf.len(),
            });
        }
        let header = Header::decode(buf)?;

        let mut record = match header.record_type {
            RecordType::Params => Record::Params(ParamsRecord::from_header(header)),
            RecordType::Unknown(_) => Record::Unknown(UnknownRecord::from_header(header)),
            _ => Record::Stream(StreamRecord::from_header(header)),
        };

        if record.is_complete() {
            // Header-only record: nothing owed beyond the 8 header bytes.
            return Ok((
                record,
                FeedOutcome::Complete {
                    last_consumed: HEADER_SIZE - 1,
                },
            ));
        }

        let outcome = match record.feed(&buf[HEADER_SIZE..]) {
            FeedOutcome::Incomplete => FeedOutcome::Incomplete,
            FeedOutcome::Complete { last_consumed } => FeedOutcome::Complete {
                last_consumed: HEADER_SIZE + last_consumed,
            },
        };
        Ok((record, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_header_bytes_rejected() {
        let factory = RecordFactory::new();
        let err = factory.create_from_header(&[1, 5, 0, 1, 0]).unwrap_err();
        assert!(matches!(
            err,
            FcgiError::InsufficientHeaderBytes { available: 5 }
        ));
    }

    #[test]
    fn test_bad_version_is_malformed() {
        let factory = RecordFactory::new();
        let err = factory
            .create_from_header(&[9, 5, 0, 1, 0, 0, 0, 0])
            .unwrap_err();
        assert!(matches!(err, FcgiError::MalformedHeader { .. }));
    }

    #[test]
    fn test_header_only_record_completes_at_index_7() {
        let factory = RecordFactory::new();
        let buf = Header::with_padding(RecordType::AbortRequest, 3, 0, 0).encode();
        let (record, outcome) = factory.create_from_header(&buf).unwrap();
        assert!(record.is_complete());
        assert_eq!(outcome, FeedOutcome::Complete { last_consumed: 7 });
    }

    #[test]
    fn test_header_surplus_is_fed_into_record() {
        let factory = RecordFactory::new();
        let mut buf = Header::with_padding(RecordType::Stdin, 1, 5, 0)
            .encode()
            .to_vec();
        buf.extend_from_slice(b"he"); // partial content
        let (record, outcome) = factory.create_from_header(&buf).unwrap();
        assert_eq!(outcome, FeedOutcome::Incomplete);
        assert_eq!(record.content(), b"he");
    }

    #[test]
    fn test_complete_record_with_surplus_reports_last_consumed() {
        let factory = RecordFactory::new();
        let mut buf = Header::with_padding(RecordType::Stdin, 1, 3, 1)
            .encode()
            .to_vec();
        buf.extend_from_slice(b"abc\0NEXT");
        let (record, outcome) = factory.create_from_header(&buf).unwrap();
        assert!(record.is_complete());
        // 8 header + 3 content + 1 padding, zero-based.
        assert_eq!(outcome, FeedOutcome::Complete { last_consumed: 11 });
        assert_eq!(record.content(), b"abc");
    }

    #[test]
    fn test_params_type_selects_params_variant() {
        let factory = RecordFactory::new();
        let buf = Header::with_padding(RecordType::Params, 1, 0, 0).encode();
        let (record, _) = factory.create_from_header(&buf).unwrap();
        assert!(matches!(record, Record::Params(_)));
    }

    #[test]
    fn test_unassigned_type_selects_unknown_variant() {
        let factory = RecordFactory::new();
        let mut buf = Header::with_padding(RecordType::Params, 1, 0, 0).encode();
        buf[1] = 250;
        let (record, _) = factory.create_from_header(&buf).unwrap();
        match record {
            Record::Unknown(rec) => assert_eq!(rec.type_byte(), 250),
            other => panic!("expected unknown record, got {other:?}"),
        }
    }
}
