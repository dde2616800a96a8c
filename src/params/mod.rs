//! Params records - request metadata as name/value pairs.
//!
//! A Params record's content is a run of length-prefixed name/value
//! pairs, the FastCGI equivalent of CGI environment variables. The same
//! record type serves both directions: a web server encodes pairs into
//! it ([`ParamsRecord::add`]), an application enumerates them back out
//! ([`ParamsRecord::params`]).
//!
//! # Example
//!
//! ```
//! use fcgi_wire::ParamsRecord;
//!
//! let mut record = ParamsRecord::new(1);
//! record.add("REQUEST_METHOD", "GET").unwrap();
//! record.add("QUERY_STRING", "q=rust").unwrap();
//!
//! let pairs: Result<Vec<_>, _> = record.params().collect();
//! let pairs = pairs.unwrap();
//! assert_eq!(pairs[0].name(), b"REQUEST_METHOD");
//! assert_eq!(pairs[1].value(), b"q=rust");
//! ```

mod nvp;

pub use nvp::{NameValuePair, NvpIter};

use crate::error::{FcgiError, Result};
use crate::protocol::record::RecordFrame;
use crate::protocol::{build_record, Header, RecordType, MAX_CONTENT_LENGTH};

/// HTTP/1.1 methods accepted by [`ParamsRecord::add_request_params`].
const VALID_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "HEAD"];

/// A record of type Params, carrying name/value pairs as its content.
#[derive(Debug)]
pub struct ParamsRecord {
    frame: RecordFrame,
}

impl ParamsRecord {
    /// Create an empty Params record for the encoder path.
    pub fn new(request_id: u16) -> Self {
        Self {
            frame: RecordFrame::empty(RecordType::Params, request_id),
        }
    }

    /// Wrap a decoded header; used by the record factory.
    pub(crate) fn from_header(header: Header) -> Self {
        Self {
            frame: RecordFrame::from_header(header),
        }
    }

    pub(crate) fn frame(&self) -> &RecordFrame {
        &self.frame
    }

    pub(crate) fn frame_mut(&mut self) -> &mut RecordFrame {
        &mut self.frame
    }

    /// Header of this record. Its content length tracks added pairs.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.frame.header
    }

    /// Request ID from the header.
    #[inline]
    pub fn request_id(&self) -> u16 {
        self.frame.header.request_id
    }

    /// Append one pair to the record content, keeping the header's
    /// content length in sync.
    ///
    /// # Errors
    ///
    /// [`FcgiError::OversizedContent`] if the pair would push the
    /// content past the 16-bit length limit.
    pub fn add_pair(&mut self, nvp: &NameValuePair) -> Result<()> {
        let new_len = self.frame.body.len() + nvp.encoded_len();
        if new_len > MAX_CONTENT_LENGTH {
            return Err(FcgiError::OversizedContent { len: new_len });
        }
        nvp.encode_into(&mut self.frame.body);
        self.frame.header.content_length = new_len as u16;
        Ok(())
    }

    /// Append a pair given as text. Make sure both strings are within
    /// the character set the receiving application expects; no
    /// validation happens at this layer.
    pub fn add(&mut self, name: &str, value: &str) -> Result<()> {
        self.add_pair(&NameValuePair::from_text(name, value))
    }

    /// Enumerate the pairs in this record, lazily, in write order.
    ///
    /// The underlying body is rewound on entry and after full
    /// enumeration, so calling this repeatedly yields the same
    /// sequence each time. Items are `Result`s: content that ends
    /// mid-pair surfaces [`FcgiError::TruncatedNvp`].
    pub fn params(&mut self) -> NvpIter<'_> {
        let limit = self.frame.header.content_length as usize;
        NvpIter::new(&mut self.frame.body, limit)
    }

    /// Add the parameter set a FastCGI application expects for an
    /// HTTP/1.1 request, from pre-split URL parts.
    ///
    /// `query` is taken unescaped; spaces are percent-encoded before it
    /// lands in QUERY_STRING and REQUEST_URI.
    ///
    /// # Errors
    ///
    /// [`FcgiError::UnsupportedMethod`] unless `method` is one of the
    /// upper-case methods GET, POST, PUT, DELETE, HEAD.
    pub fn add_request_params(
        &mut self,
        method: &str,
        host: &str,
        path: &str,
        query: &str,
        https: bool,
    ) -> Result<()> {
        if !VALID_METHODS.contains(&method) {
            return Err(FcgiError::UnsupportedMethod(method.to_string()));
        }

        let query = escape_query(query);
        let request_uri = if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        };

        self.add("HTTP_HOST", host)?;
        if https {
            self.add("HTTPS", "https")?;
        }
        self.add("SCRIPT_NAME", path)?;
        self.add("DOCUMENT_URI", path)?;
        self.add("REQUEST_METHOD", method)?;
        self.add("SERVER_NAME", host)?;
        self.add("QUERY_STRING", &query)?;
        self.add("REQUEST_URI", &request_uri)?;
        self.add("SERVER_PROTOCOL", "HTTP/1.1")?;
        self.add("GATEWAY_INTERFACE", "CGI/1.1")?;
        Ok(())
    }

    /// Serialize this record for the wire: header, content, zero
    /// padding to the next 8-byte boundary.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        build_record(
            RecordType::Params,
            self.request_id(),
            self.frame.body.as_slice(),
        )
    }
}

fn escape_query(query: &str) -> String {
    query.replace(' ', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(record: &mut ParamsRecord) -> Vec<(Vec<u8>, Vec<u8>)> {
        record
            .params()
            .map(|res| {
                let pair = res.unwrap();
                (pair.name().to_vec(), pair.value().to_vec())
            })
            .collect()
    }

    #[test]
    fn test_add_then_enumerate_in_order() {
        let mut record = ParamsRecord::new(1);
        record.add("SERVER_NAME", "example.org").unwrap();
        record.add("REQUEST_METHOD", "GET").unwrap();

        let pairs = collect(&mut record);
        assert_eq!(
            pairs,
            vec![
                (b"SERVER_NAME".to_vec(), b"example.org".to_vec()),
                (b"REQUEST_METHOD".to_vec(), b"GET".to_vec()),
            ]
        );
    }

    #[test]
    fn test_content_length_tracks_added_pairs() {
        let mut record = ParamsRecord::new(1);
        assert_eq!(record.header().content_length, 0);

        record.add("ab", "cde").unwrap();
        // 1 + 1 prefix bytes, 2 + 3 payload bytes.
        assert_eq!(record.header().content_length, 7);
    }

    #[test]
    fn test_enumeration_twice_yields_same_pairs() {
        let mut record = ParamsRecord::new(1);
        record.add("a", "1").unwrap();
        record.add("b", "2").unwrap();
        assert_eq!(collect(&mut record), collect(&mut record));
    }

    #[test]
    fn test_oversized_add_rejected() {
        let mut record = ParamsRecord::new(1);
        let big = "v".repeat(40_000);
        record.add("first", &big).unwrap();
        let err = record.add("second", &big).unwrap_err();
        assert!(matches!(err, FcgiError::OversizedContent { .. }));
        // The failed add left the record untouched.
        assert_eq!(collect(&mut record).len(), 1);
    }

    #[test]
    fn test_to_bytes_wire_layout() {
        let mut record = ParamsRecord::new(3);
        record.add("k", "v").unwrap();
        let bytes = record.to_bytes().unwrap();

        let header = Header::decode(&bytes).unwrap();
        assert_eq!(header.record_type, RecordType::Params);
        assert_eq!(header.request_id, 3);
        assert_eq!(header.content_length, 4);
        assert_eq!(header.padding_length, 4);
        assert_eq!(&bytes[8..12], &[0x01, 0x01, b'k', b'v']);
        assert_eq!(&bytes[12..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_request_params_set() {
        let mut record = ParamsRecord::new(1);
        record
            .add_request_params("GET", "example.org", "/index.cgi", "a=b c", true)
            .unwrap();

        let pairs = collect(&mut record);
        let get = |name: &[u8]| {
            pairs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
                .unwrap()
        };

        assert_eq!(get(b"HTTP_HOST"), b"example.org".to_vec());
        assert_eq!(get(b"HTTPS"), b"https".to_vec());
        assert_eq!(get(b"REQUEST_METHOD"), b"GET".to_vec());
        assert_eq!(get(b"QUERY_STRING"), b"a=b%20c".to_vec());
        assert_eq!(get(b"REQUEST_URI"), b"/index.cgi?a=b%20c".to_vec());
        assert_eq!(get(b"SERVER_PROTOCOL"), b"HTTP/1.1".to_vec());
        assert_eq!(get(b"GATEWAY_INTERFACE"), b"CGI/1.1".to_vec());
    }

    #[test]
    fn test_request_params_without_https_or_query() {
        let mut record = ParamsRecord::new(1);
        record
            .add_request_params("POST", "h", "/submit", "", false)
            .unwrap();

        let pairs = collect(&mut record);
        assert!(!pairs.iter().any(|(n, _)| n == b"HTTPS"));
        let uri = pairs.iter().find(|(n, _)| n == b"REQUEST_URI").unwrap();
        assert_eq!(uri.1, b"/submit".to_vec());
    }

    #[test]
    fn test_lowercase_method_rejected() {
        let mut record = ParamsRecord::new(1);
        let err = record
            .add_request_params("get", "h", "/", "", false)
            .unwrap_err();
        assert!(matches!(err, FcgiError::UnsupportedMethod(_)));
    }
}
