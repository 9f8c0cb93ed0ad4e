//! Sequential single-request client.
//!
//! The baseline variant: one blocking call per invocation, no internal
//! concurrency. Payload extraction is deferred to the caller via
//! [`CallOutcome::extract_payload`].

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

use crate::client::HttpClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::request::{Method, Payload, RequestDescriptor};
use crate::response::ResponseRecord;
use crate::transport::{HttpTransport, ReqwestTransport};

/// The request that was sent and the response it produced.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub request: RequestDescriptor,
    pub response: ResponseRecord,
}

impl CallOutcome {
    /// Extract and decode the JSON payload from the response.
    ///
    /// Fails with [`ApiError::CallFailed`] when the status is above 399,
    /// carrying the original request and a trimmed response summary.
    /// `204 No Content` yields an empty object without touching the
    /// decoder. Anything else is decoded as JSON.
    pub fn extract_payload(&self) -> Result<Value, ApiError> {
        if self.response.status > 399 {
            return Err(ApiError::CallFailed {
                request: Box::new(self.request.clone()),
                status: self.response.status,
                body: String::from_utf8_lossy(&self.response.body).into_owned(),
            });
        }
        if self.response.status == 204 {
            return Ok(serde_json::json!({}));
        }
        Ok(serde_json::from_slice(&self.response.body)?)
    }
}

/// Sequential client: each verb call executes exactly one request and
/// blocks until the response has been parsed.
#[derive(Debug, Clone)]
pub struct SingleClient<T = ReqwestTransport> {
    base_url: String,
    transport: T,
    config: ClientConfig,
}

impl SingleClient<ReqwestTransport> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, ReqwestTransport::new())
    }

    pub fn with_config(
        base_url: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: base_url.into(),
            transport: ReqwestTransport::with_config(&config)?,
            config,
        })
    }
}

impl<T: HttpTransport> SingleClient<T> {
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            config: ClientConfig::default(),
        }
    }

    async fn call(
        &self,
        request: RequestDescriptor,
        timeout: Option<Duration>,
    ) -> Result<CallOutcome, ApiError> {
        let timeout = self.config.resolve_timeout(timeout);
        let capture = self.transport.execute(&request, timeout).await?;
        let response = ResponseRecord::from_capture(capture);
        Ok(CallOutcome { request, response })
    }
}

#[async_trait]
impl<T: HttpTransport> HttpClient for SingleClient<T> {
    type Receipt = CallOutcome;

    async fn http_get(
        &mut self,
        path: &str,
        query: &[(&str, &str)],
        headers: IndexMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<CallOutcome, ApiError> {
        let request = RequestDescriptor::build(
            Method::Get,
            &self.base_url,
            path,
            query,
            None,
            None,
            headers,
            &self.config,
        );
        self.call(request, timeout).await
    }

    async fn http_post(
        &mut self,
        path: &str,
        content_type: &str,
        query: &[(&str, &str)],
        payload: Payload,
        headers: IndexMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<CallOutcome, ApiError> {
        let request = RequestDescriptor::build(
            Method::Post,
            &self.base_url,
            path,
            query,
            Some(content_type),
            Some(payload),
            headers,
            &self.config,
        );
        self.call(request, timeout).await
    }

    async fn http_put(
        &mut self,
        path: &str,
        content_type: &str,
        query: &[(&str, &str)],
        payload: Payload,
        headers: IndexMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<CallOutcome, ApiError> {
        let request = RequestDescriptor::build(
            Method::Put,
            &self.base_url,
            path,
            query,
            Some(content_type),
            Some(payload),
            headers,
            &self.config,
        );
        self.call(request, timeout).await
    }

    async fn http_delete(
        &mut self,
        path: &str,
        query: &[(&str, &str)],
        headers: IndexMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<CallOutcome, ApiError> {
        let request = RequestDescriptor::build(
            Method::Delete,
            &self.base_url,
            path,
            query,
            None,
            None,
            headers,
            &self.config,
        );
        self.call(request, timeout).await
    }
}
