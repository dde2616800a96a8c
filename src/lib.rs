//! # fcgi-wire
//!
//! Sans-I/O implementation of the FastCGI wire protocol's record layer.
//!
//! Sockets deliver bytes in arbitrary fragments relative to record
//! boundaries; this crate turns that stream back into complete, typed
//! records with at most 7 bytes of carry-over state, and encodes
//! structured request parameters into the protocol's length-prefixed
//! name/value form.
//!
//! ## Architecture
//!
//! - **Record layer** ([`protocol`]): header model, incremental feed
//!   state machine, and the [`ByteReader`] reassembly engine.
//! - **Params layer** ([`params`]): the name/value-pair sub-encoding
//!   carried inside Params records.
//!
//! No I/O happens here. Drive a [`ByteReader`] from your transport's
//! read loop, one call per received chunk, in receipt order.
//!
//! ## Example
//!
//! ```
//! use fcgi_wire::{ByteReader, ParamsRecord, Record};
//!
//! // Sender side: encode parameters into a Params record.
//! let mut params = ParamsRecord::new(1);
//! params.add("REQUEST_METHOD", "GET").unwrap();
//! let wire = params.to_bytes().unwrap();
//!
//! // Receiver side: reassemble from fragmented delivery.
//! let mut reader = ByteReader::new();
//! let mut records = Vec::new();
//! for chunk in wire.chunks(3) {
//!     records.extend(reader.read(chunk).unwrap());
//! }
//!
//! let mut decoded = match records.remove(0) {
//!     Record::Params(rec) => rec,
//!     other => panic!("expected params, got {other:?}"),
//! };
//! let pairs: Result<Vec<_>, _> = decoded.params().collect();
//! assert_eq!(pairs.unwrap()[0].name(), b"REQUEST_METHOD");
//! ```

pub mod error;
pub mod params;
pub mod protocol;

pub use error::{FcgiError, Result};
pub use params::{NameValuePair, NvpIter, ParamsRecord};
pub use protocol::{
    build_record, ByteReader, FeedOutcome, Header, Record, RecordBody, RecordFactory, RecordType,
    StreamRecord, UnknownRecord,
};
