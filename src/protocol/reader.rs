//! Incremental reassembly of records from a fragmented byte stream.
//!
//! Sockets deliver bytes in arbitrary fragments relative to record
//! boundaries: one read may carry half a header, several whole records,
//! or a header split at byte 3. [`ByteReader`] consumes successive
//! chunks of any size and yields fully reconstructed records, carrying
//! at most 7 header-prefix bytes between calls.
//!
//! State machine per chunk:
//! - No record in progress and fewer than 8 bytes on hand: stash them
//!   in the carry-over buffer and wait for the next chunk.
//! - Carry-over present: top it up to exactly 8 bytes, run the factory
//!   on those, then feed the rest of the chunk into the new record.
//! - Record in progress: feed the remaining chunk bytes into it.
//!
//! The factory is only ever invoked with a certain full header, so
//! header parsing needs no incremental state of its own; only
//! content/padding feeding does. The reader copies everything it needs
//! out of the caller's chunk; no references survive the call.
//!
//! # Example
//!
//! ```
//! use fcgi_wire::protocol::{build_record, ByteReader, RecordType};
//!
//! let wire = build_record(RecordType::Stdin, 1, b"hello").unwrap();
//! let mut reader = ByteReader::new();
//!
//! // Delivery is fragmented; records surface only once complete.
//! let records = reader.read(&wire[..3]).unwrap();
//! assert!(records.is_empty());
//! let records = reader.read(&wire[3..]).unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].content(), b"hello");
//! ```

use super::factory::RecordFactory;
use super::record::{FeedOutcome, Record};
use super::wire_format::HEADER_SIZE;
use crate::error::Result;

/// One step of the reassembly loop.
enum StepOutcome {
    /// A record was completed; the chunk offset has been advanced past
    /// its last byte.
    Completed(Record),
    /// All remaining chunk bytes were absorbed into carry-over or an
    /// in-progress record; nothing more can happen this call.
    NeedMore,
}

/// Reassembles complete records from arbitrarily chunked bytes.
///
/// One reader per connection; `read` calls must be sequenced in receipt
/// order by the caller's I/O loop. Completed records are owned by the
/// caller from the moment they are returned.
#[derive(Debug, Default)]
pub struct ByteReader {
    factory: RecordFactory,
    /// Header-prefix bytes received but not yet sufficient to form a
    /// full 8-byte header. Non-empty only when no record is in progress.
    carry: [u8; HEADER_SIZE],
    carry_len: usize,
    in_progress: Option<Record>,
}

impl ByteReader {
    /// Create a new reader with the default record factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader around a specific factory.
    pub fn with_factory(factory: RecordFactory) -> Self {
        Self {
            factory,
            carry: [0u8; HEADER_SIZE],
            carry_len: 0,
            in_progress: None,
        }
    }

    /// Number of carried-over header-prefix bytes (at most 7).
    #[inline]
    pub fn carried_bytes(&self) -> usize {
        self.carry_len
    }

    /// Whether a partially fed record is awaiting more bytes.
    #[inline]
    pub fn has_partial_record(&self) -> bool {
        self.in_progress.is_some()
    }

    /// Consume one chunk of the stream and return every record it
    /// completed, in wire order. A single chunk may complete several
    /// records; equally, many chunks may go by before one completes.
    ///
    /// # Errors
    ///
    /// [`FcgiError::MalformedHeader`](crate::FcgiError::MalformedHeader)
    /// if a record header carries an unsupported version byte. This is
    /// connection-fatal: the reader's state is untouched (the header is
    /// rejected before any mutation), but with no sync markers in the
    /// stream there is nothing safe to resume from. Drop the reader and
    /// close the connection.
    pub fn read(&mut self, chunk: &[u8]) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut offset = 0;

        while offset < chunk.len() {
            match self.step(chunk, &mut offset)? {
                StepOutcome::Completed(record) => {
                    tracing::debug!(
                        record_type = ?record.record_type(),
                        request_id = record.request_id(),
                        content_length = record.content_length(),
                        "record complete"
                    );
                    records.push(record);
                }
                StepOutcome::NeedMore => break,
            }
        }

        Ok(records)
    }

    /// Advance the loop by one record attempt. Either completes a
    /// record (advancing `offset` past its final byte) or absorbs all
    /// remaining bytes into reader state.
    fn step(&mut self, chunk: &[u8], offset: &mut usize) -> Result<StepOutcome> {
        let remaining = &chunk[*offset..];

        // Feed an in-progress record before anything else.
        if let Some(mut record) = self.in_progress.take() {
            tracing::trace!(bytes = remaining.len(), "feeding in-progress record");
            return match record.feed(remaining) {
                FeedOutcome::Incomplete => {
                    self.in_progress = Some(record);
                    tracing::debug!("record still incomplete");
                    *offset = chunk.len();
                    Ok(StepOutcome::NeedMore)
                }
                FeedOutcome::Complete { last_consumed } => {
                    *offset += last_consumed + 1;
                    Ok(StepOutcome::Completed(record))
                }
            };
        }

        // No record started: do we even have a full header yet?
        if self.carry_len + remaining.len() < HEADER_SIZE {
            self.carry[self.carry_len..self.carry_len + remaining.len()]
                .copy_from_slice(remaining);
            self.carry_len += remaining.len();
            tracing::debug!(
                carried = self.carry_len,
                "not enough bytes for a record header yet"
            );
            *offset = chunk.len();
            return Ok(StepOutcome::NeedMore);
        }

        let (record, outcome) = if self.carry_len > 0 {
            // Top the carry buffer up to exactly 8 bytes, parse the
            // header from it, then continue from the chunk.
            let needed = HEADER_SIZE - self.carry_len;
            self.carry[self.carry_len..].copy_from_slice(&remaining[..needed]);
            let (record, outcome) = self.factory.create_from_header(&self.carry)?;
            self.carry_len = 0;
            *offset += needed;
            // The carry buffer held exactly the header, so the factory
            // outcome is either Incomplete or the header-only Complete.
            (record, outcome)
        } else {
            let (record, outcome) = self.factory.create_from_header(remaining)?;
            match outcome {
                FeedOutcome::Incomplete => *offset = chunk.len(),
                FeedOutcome::Complete { last_consumed } => *offset += last_consumed + 1,
            }
            (record, outcome)
        };

        match outcome {
            FeedOutcome::Complete { .. } => Ok(StepOutcome::Completed(record)),
            FeedOutcome::Incomplete => {
                self.in_progress = Some(record);
                if *offset < chunk.len() {
                    // Header came out of the carry buffer; the rest of
                    // the chunk now goes through the feed path.
                    self.step(chunk, offset)
                } else {
                    Ok(StepOutcome::NeedMore)
                }
            }
        }
    }
}
