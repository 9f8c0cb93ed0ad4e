//! Uniform verb-level client interface.

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::error::ApiError;
use crate::request::Payload;

/// The four verb methods shared by every client variant.
///
/// What a verb call hands back differs per variant: the sequential client
/// returns a completed [`CallOutcome`](crate::single::CallOutcome), the
/// parallel client a [`Submission`](crate::multi::Submission) receipt for a
/// call that has not executed yet. `timeout` is per call; `None` falls back
/// to the client config's default (45 s out of the box).
#[async_trait]
pub trait HttpClient {
    type Receipt;

    /// Make a HTTP GET request to the API.
    async fn http_get(
        &mut self,
        path: &str,
        query: &[(&str, &str)],
        headers: IndexMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<Self::Receipt, ApiError>;

    /// Make a HTTP POST request to the API, uploading `payload` as
    /// `content_type`.
    async fn http_post(
        &mut self,
        path: &str,
        content_type: &str,
        query: &[(&str, &str)],
        payload: Payload,
        headers: IndexMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<Self::Receipt, ApiError>;

    /// Make a HTTP PUT request to the API, uploading `payload` as
    /// `content_type`.
    async fn http_put(
        &mut self,
        path: &str,
        content_type: &str,
        query: &[(&str, &str)],
        payload: Payload,
        headers: IndexMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<Self::Receipt, ApiError>;

    /// Make a HTTP DELETE request to the API.
    async fn http_delete(
        &mut self,
        path: &str,
        query: &[(&str, &str)],
        headers: IndexMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<Self::Receipt, ApiError>;
}
