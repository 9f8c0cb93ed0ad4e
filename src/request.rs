//! Request descriptors and the builder that produces them.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::headers;
use crate::url::build_url;

/// The HTTP verbs this layer supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The body of an outgoing POST/PUT request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// Multi-field body; the transport form-encodes it.
    Form(IndexMap<String, String>),
    /// Scalar body sent verbatim.
    Text(String),
    /// Object-like body sent as a JSON-encoded string.
    Json(serde_json::Value),
}

/// The immutable record of one outgoing request, built before any network
/// activity occurs. Headers always include the effective defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: Method,
    pub payload: Option<Payload>,
    pub headers: IndexMap<String, String>,
}

impl RequestDescriptor {
    /// Build a descriptor from verb-level inputs. Cannot fail in isolation.
    ///
    /// For POST/PUT the `Content-Type` header is forced to the supplied
    /// content type, overwriting any caller-supplied value of that key.
    /// Defaults never overwrite caller values.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn build(
        method: Method,
        base_url: &str,
        path: &str,
        query: &[(&str, &str)],
        content_type: Option<&str>,
        payload: Option<Payload>,
        mut headers: IndexMap<String, String>,
        config: &ClientConfig,
    ) -> Self {
        let url = build_url(base_url, path, query);
        headers::merge_defaults(&mut headers, headers::default_headers(config));
        if let Some(content_type) = content_type {
            headers.insert("Content-Type".to_string(), content_type.to_string());
        }
        Self {
            url,
            method,
            payload,
            headers,
        }
    }
}
