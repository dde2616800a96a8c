//! Protocol module - wire format, record framing, and reassembly.
//!
//! This module implements the record layer of the binary protocol:
//! - 8-byte header encoding/decoding
//! - Record variants fed incrementally from fragmented reads
//! - The ByteReader reassembly engine

mod body;
mod factory;
mod reader;
pub(crate) mod record;
mod wire_format;

pub use body::RecordBody;
pub use factory::RecordFactory;
pub use reader::ByteReader;
pub use record::{build_record, FeedOutcome, Record, StreamRecord, UnknownRecord};
pub use wire_format::{
    padding_for, Header, RecordType, FCGI_VERSION, HEADER_SIZE, MAX_CONTENT_LENGTH,
};
