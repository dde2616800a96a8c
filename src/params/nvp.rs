//! Name/value pair codec.
//!
//! FastCGI encodes request parameters as length-prefixed pairs with no
//! separators: `len(name) ++ len(value) ++ name ++ value`. Each length
//! is one byte when it fits in 7 bits; otherwise four bytes big-endian
//! with the top bit set, so the first byte disambiguates the two forms
//! on decode.
//!
//! Names and values are raw bytes at this layer; no character-set
//! policy is applied.

use bytes::Bytes;

use crate::error::{FcgiError, Result};
use crate::protocol::RecordBody;

/// Lengths of 127 or less use the single-byte prefix form.
const SHORT_FORM_MAX: usize = 0x7f;

/// High bit of the four-byte prefix form.
const LONG_FORM_FLAG: u32 = 0x8000_0000;

/// One request parameter: a name and a value, both raw bytes.
///
/// # Example
///
/// ```
/// use fcgi_wire::NameValuePair;
///
/// let nvp = NameValuePair::from_text("HTTP_HOST", "localhost");
/// assert_eq!(nvp.name(), b"HTTP_HOST");
/// assert_eq!(nvp.encoded_len(), 2 + 9 + 9);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameValuePair {
    name: Bytes,
    value: Bytes,
}

impl NameValuePair {
    /// Create a pair from anything convertible to `Bytes`.
    pub fn new(name: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create a pair by copying text (the common CGI-variable case).
    pub fn from_text(name: &str, value: &str) -> Self {
        Self {
            name: Bytes::copy_from_slice(name.as_bytes()),
            value: Bytes::copy_from_slice(value.as_bytes()),
        }
    }

    /// Name bytes.
    #[inline]
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Value bytes.
    #[inline]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Wire size of this pair: both prefixes plus both byte strings.
    pub fn encoded_len(&self) -> usize {
        prefix_len(self.name.len()) + prefix_len(self.value.len()) + self.name.len()
            + self.value.len()
    }

    /// Append the encoded pair to a record body.
    pub fn encode_into(&self, body: &mut RecordBody) {
        encode_length(self.name.len(), body);
        encode_length(self.value.len(), body);
        body.write(&self.name);
        body.write(&self.value);
    }

    /// Encode the pair into a standalone byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut body = RecordBody::with_capacity(self.encoded_len());
        self.encode_into(&mut body);
        body.as_slice().to_vec()
    }
}

#[inline]
fn prefix_len(len: usize) -> usize {
    if len <= SHORT_FORM_MAX {
        1
    } else {
        4
    }
}

fn encode_length(len: usize, body: &mut RecordBody) {
    if len <= SHORT_FORM_MAX {
        body.write(&[len as u8]);
    } else {
        body.write(&((len as u32) | LONG_FORM_FLAG).to_be_bytes());
    }
}

/// Lazy decoder over a Params record's content.
///
/// Rewinds the body to the start on construction and again once the
/// declared content length has been consumed, so repeated enumeration
/// is idempotent and yields pairs in write order. The iterator stops
/// exactly at the content length and fails with
/// [`FcgiError::TruncatedNvp`] if the content ends mid-pair.
#[derive(Debug)]
pub struct NvpIter<'a> {
    body: &'a mut RecordBody,
    /// Declared content length; decoding never reads past it.
    limit: usize,
    consumed: usize,
    failed: bool,
}

impl<'a> NvpIter<'a> {
    pub(crate) fn new(body: &'a mut RecordBody, limit: usize) -> Self {
        body.rewind();
        Self {
            body,
            limit,
            consumed: 0,
            failed: false,
        }
    }

    /// Consume `n` content bytes, respecting the declared limit.
    fn take(&mut self, n: usize) -> Result<&[u8]> {
        let available = (self.limit - self.consumed).min(self.body.remaining());
        if n > available {
            return Err(FcgiError::TruncatedNvp {
                needed: n,
                available,
            });
        }
        self.consumed += n;
        let bytes = self
            .body
            .read_slice(n)
            .expect("availability checked against body remaining");
        Ok(bytes)
    }

    /// Read a 1- or 4-byte length prefix, keyed off the high bit.
    fn read_length(&mut self) -> Result<usize> {
        let first = self.take(1)?[0];
        if first & 0x80 == 0 {
            return Ok(first as usize);
        }
        let rest = self.take(3)?;
        let len = u32::from_be_bytes([first & 0x7f, rest[0], rest[1], rest[2]]);
        Ok(len as usize)
    }

    fn read_pair(&mut self) -> Result<NameValuePair> {
        let name_len = self.read_length()?;
        let value_len = self.read_length()?;
        let name = Bytes::copy_from_slice(self.take(name_len)?);
        let value = Bytes::copy_from_slice(self.take(value_len)?);
        Ok(NameValuePair { name, value })
    }
}

impl Iterator for NvpIter<'_> {
    type Item = Result<NameValuePair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.consumed >= self.limit {
            self.body.rewind();
            return None;
        }
        match self.read_pair() {
            Ok(pair) => Some(Ok(pair)),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
