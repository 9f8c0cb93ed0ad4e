//! apiwire
//!
//! A uniform client layer for JSON APIs: four verb methods over a base URL,
//! request/response metadata capture, and JSON payload extraction, with two
//! interchangeable execution strategies (a sequential [`SingleClient`] and a
//! batched parallel [`MultiClient`]) over a swappable [`HttpTransport`]
//! backend.
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod multi;
pub mod request;
pub mod response;
pub mod single;
pub mod transport;
pub mod url;

pub use client::HttpClient;
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::ApiError;
pub use multi::{MultiClient, Submission};
pub use request::{Method, Payload, RequestDescriptor};
pub use response::ResponseRecord;
pub use single::{CallOutcome, SingleClient};
pub use transport::{HttpTransport, ReqwestTransport, TransportResponse};
