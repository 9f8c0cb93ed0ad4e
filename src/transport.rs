//! HTTP transport abstraction and the default reqwest backend.
//!
//! The clients only ever talk to [`HttpTransport`], so a custom backend
//! (including a synthetic in-memory one for tests) can be swapped in
//! without changing call sites.

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::headers;
use crate::request::{Method, Payload, RequestDescriptor};

/// Raw capture of one completed exchange: the response header block and
/// body concatenated in one buffer, split later at the reported header
/// byte length.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub header_len: usize,
    pub raw: Vec<u8>,
}

/// One-request execution seam between the clients and the HTTP backend.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute a single request, bounded by `timeout`, capturing the full
    /// response with headers. Transport-level failures (connect refused,
    /// timeout, DNS) surface as [`ApiError::TransportFailure`].
    async fn execute(
        &self,
        request: &RequestDescriptor,
        timeout: Duration,
    ) -> Result<TransportResponse, ApiError>;
}

/// Default backend over a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Build a backend honoring the config's connection timeout.
    pub fn with_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::ConfigurationError(e.to_string()))?;
        Ok(Self { client })
    }

    fn header_map(request: &RequestDescriptor) -> Result<HeaderMap, ApiError> {
        let mut map = HeaderMap::with_capacity(request.headers.len());
        for (key, value) in &request.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                ApiError::ConfigurationError(format!("invalid header name '{key}': {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ApiError::ConfigurationError(format!("invalid header value '{value}': {e}"))
            })?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: &RequestDescriptor,
        timeout: Duration,
    ) -> Result<TransportResponse, ApiError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url).timeout(timeout);
        match &request.payload {
            Some(Payload::Form(fields)) => {
                builder = builder.form(fields);
            }
            Some(Payload::Text(body)) => {
                builder = builder.body(body.clone());
            }
            Some(Payload::Json(value)) => {
                builder = builder.body(value.to_string());
            }
            None => {}
        }
        // Descriptor headers go on last so the forced Content-Type wins over
        // whatever the body setter picked.
        builder = builder.headers(Self::header_map(request)?);

        tracing::debug!(method = %request.method, url = %request.url, "executing request");
        let response = builder.send().await?;
        let status = response.status().as_u16();

        // Reconstruct the capture the parser expects: header block first,
        // body bytes following. Non-UTF-8 header values are dropped.
        let header_fields: IndexMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (key.as_str().to_string(), v.to_string()))
            })
            .collect();
        let block = headers::wire_lines(&header_fields).join("\r\n");
        let body = response.bytes().await?;

        let mut raw = block.into_bytes();
        let header_len = raw.len();
        raw.extend_from_slice(&body);

        Ok(TransportResponse {
            status,
            header_len,
            raw,
        })
    }
}
