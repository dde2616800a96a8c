//! Error types for fcgi-wire.

use thiserror::Error;

/// Main error type for all record-layer operations.
#[derive(Debug, Error)]
pub enum FcgiError {
    /// The 8 bytes at the start of a record do not form a valid header
    /// (short buffer or unsupported protocol version). Connection-fatal:
    /// FastCGI streams carry no sync markers to resynchronize on.
    #[error("malformed record header: {reason}")]
    MalformedHeader { reason: String },

    /// The record factory was invoked with fewer than a full header's worth
    /// of bytes. The reassembly engine guarantees this never happens, so
    /// hitting it means a caller bypassed the engine's precondition.
    #[error("record factory needs 8 header bytes, got {available}")]
    InsufficientHeaderBytes { available: usize },

    /// A name/value pair declared more bytes than the record content holds.
    /// A decode error on that record only; engine state is unaffected.
    #[error("truncated name/value pair: needed {needed} more bytes, {available} left in content")]
    TruncatedNvp { needed: usize, available: usize },

    /// Record content would exceed the protocol's 16-bit content length.
    #[error("record content of {len} bytes exceeds the 65535-byte limit")]
    OversizedContent { len: usize },

    /// HTTP method outside the supported set for parameter generation.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}

/// Result type alias using FcgiError.
pub type Result<T> = std::result::Result<T, FcgiError>;
