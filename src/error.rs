//! Error handling types for apiwire.
//!
//! One public error enum covers the whole call surface: transport-level
//! failures, HTTP-level call failures carrying request/response context,
//! body decode failures, and configuration problems detected while handing
//! a request to the backend.

use thiserror::Error;

use crate::request::RequestDescriptor;

/// Errors surfaced by the verb methods, `extract_payload` and `drain`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The network call itself failed (connect refused, timeout, DNS, ...).
    /// Batch failures prefix the failing slot index into the detail string.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// The call completed at the transport level but the server answered
    /// with an error status. Carries the original request and a trimmed
    /// response summary so the failure can be diagnosed without re-running
    /// the call.
    #[error("API call {} {} failed with status {status}", .request.method, .request.url)]
    CallFailed {
        request: Box<RequestDescriptor>,
        status: u16,
        body: String,
    },

    /// The response claimed a JSON-decodable status but the body failed to
    /// parse.
    #[error("failed to decode response body: {0}")]
    DecodeFailure(String),

    /// A request could not be handed to the backend as configured
    /// (invalid header name/value, unbuildable backend client).
    #[error("configuration error: {0}")]
    ConfigurationError(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::TransportFailure(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::DecodeFailure(err.to_string())
    }
}
