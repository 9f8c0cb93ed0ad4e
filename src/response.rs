//! Raw response parsing shared by both clients.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::ApiError;
use crate::transport::TransportResponse;

/// One completed response: status, raw header block, body, parsed headers,
/// and, on the parallel client's decodable statuses, the decoded JSON
/// payload. Derived strictly from a completed transport capture.
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub status: u16,
    pub raw_header_block: String,
    pub body: Vec<u8>,
    pub headers: IndexMap<String, String>,
    pub json: Option<Value>,
}

/// Pure byte-offset split of a raw capture into header block and body.
/// No boundary validation beyond what the transport reports; the offset is
/// clamped to the buffer.
pub fn split_header_body(raw: &[u8], header_len: usize) -> (String, Vec<u8>) {
    let cut = header_len.min(raw.len());
    let block = String::from_utf8_lossy(&raw[..cut]).into_owned();
    (block, raw[cut..].to_vec())
}

/// Parse a raw header block: split on CRLF, split each line at the first
/// `:`, trim the value. A line with no `:` yields an entry with an empty
/// key and the full trimmed line as value. Later duplicate keys overwrite
/// earlier ones.
pub fn parse_header_lines(block: &str) -> IndexMap<String, String> {
    let mut headers = IndexMap::new();
    for line in block.split("\r\n") {
        match line.split_once(':') {
            Some((key, value)) => headers.insert(key.to_string(), value.trim().to_string()),
            None => headers.insert(String::new(), line.trim().to_string()),
        };
    }
    headers
}

impl ResponseRecord {
    /// Parse a raw transport capture. The JSON payload starts out absent.
    pub fn from_capture(capture: TransportResponse) -> Self {
        let (raw_header_block, body) = split_header_body(&capture.raw, capture.header_len);
        let headers = parse_header_lines(&raw_header_block);
        Self {
            status: capture.status,
            raw_header_block,
            body,
            headers,
            json: None,
        }
    }

    /// Finish construction for the parallel harvest path: decode the body
    /// in place when the status says there is a JSON payload to decode.
    /// `204 No Content` and the redirect range stay undecoded.
    pub(crate) fn decoded(mut self) -> Result<Self, ApiError> {
        if self.status < 300 && self.status != 204 {
            self.json = Some(serde_json::from_slice(&self.body)?);
        }
        Ok(self)
    }
}
