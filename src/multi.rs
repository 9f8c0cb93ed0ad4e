//! Batched parallel client: the concurrent driver core.
//!
//! Verb calls only *register* work: each one builds a request the same way
//! the sequential client does, parks it in the batch at the next slot
//! index, and returns a [`Submission`] receipt. [`MultiClient::drain`]
//! then drives every registered call concurrently on one driver loop and
//! harvests the results keyed by slot index. Completion order on the wire
//! never leaks into the harvest: `result[i]` always belongs to the i-th
//! submission.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use indexmap::IndexMap;

use crate::client::HttpClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::request::{Method, Payload, RequestDescriptor};
use crate::response::ResponseRecord;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Receipt for one registered call: the request that will be sent and the
/// slot index its result will be harvested under.
#[derive(Debug, Clone)]
pub struct Submission {
    pub request: RequestDescriptor,
    pub slot: usize,
}

/// One registered call waiting for the next drain.
#[derive(Debug)]
struct PendingCall {
    request: RequestDescriptor,
    timeout: Duration,
}

/// Parallel client: accumulates calls, then executes the whole batch
/// concurrently inside [`drain`](MultiClient::drain).
///
/// Batch state is exclusively owned: `submit` and `drain` take `&mut self`,
/// so one batch is only ever driven by one task.
#[derive(Debug)]
pub struct MultiClient<T = ReqwestTransport> {
    base_url: String,
    transport: T,
    config: ClientConfig,
    batch: Vec<PendingCall>,
}

impl MultiClient<ReqwestTransport> {
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
            batch: Vec::new(),
        })
    }
}

impl<T: HttpTransport> MultiClient<T> {
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            config: ClientConfig::default(),
            batch: Vec::new(),
        }
    }

    /// Number of calls registered for the next drain.
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    /// Register one built request at the next slot. Executes nothing.
    fn submit(&mut self, request: RequestDescriptor, timeout: Option<Duration>) -> Submission {
        let timeout = self.config.resolve_timeout(timeout);
        let slot = self.batch.len();
        tracing::debug!(slot, method = %request.method, url = %request.url, "registered call");
        self.batch.push(PendingCall {
            request: request.clone(),
            timeout,
        });
        Submission { request, slot }
    }

    /// Execute every registered call concurrently and harvest the results
    /// keyed by slot index.
    ///
    /// The whole batch is moved into the driver up front, so the client is
    /// back to an empty, reusable state on every exit path; a failed drain
    /// cannot leak registrations into the next one. Draining an empty batch
    /// is legal and returns an empty map without driver work.
    ///
    /// The harvest walks slots in submission order and aborts on the first
    /// failing slot: transport failures become
    /// [`ApiError::TransportFailure`] with the slot index in the detail,
    /// statuses above 399 become [`ApiError::CallFailed`] for that slot's
    /// request. Successful records with a status below 300 (other than 204)
    /// have their JSON payload decoded eagerly; 204 and the redirect range
    /// are kept undecoded for the caller to inspect.
    pub async fn drain(&mut self) -> Result<BTreeMap<usize, ResponseRecord>, ApiError> {
        if self.batch.is_empty() {
            return Ok(BTreeMap::new());
        }
        let batch = std::mem::take(&mut self.batch);
        tracing::debug!(calls = batch.len(), "draining batch");

        // One shared driver loop: every pending call progresses while the
        // task parks between readiness events. A slow or failing call never
        // blocks its siblings from completing.
        let transport = &self.transport;
        let mut in_flight: FuturesUnordered<_> = batch
            .into_iter()
            .enumerate()
            .map(|(slot, call)| async move {
                let PendingCall { request, timeout } = call;
                let outcome = transport.execute(&request, timeout).await;
                (slot, request, outcome)
            })
            .collect();

        let mut settled = Vec::with_capacity(in_flight.len());
        while let Some(done) = in_flight.next().await {
            settled.push(done);
        }
        // Every call has settled; completion order is irrelevant from here.
        settled.sort_by_key(|(slot, _, _)| *slot);

        let mut results = BTreeMap::new();
        for (slot, request, outcome) in settled {
            let capture = outcome.map_err(|err| match err {
                ApiError::TransportFailure(detail) => {
                    tracing::warn!(slot, %detail, "transport failure in batch");
                    ApiError::TransportFailure(format!("slot {slot}: {detail}"))
                }
                other => other,
            })?;
            let record = ResponseRecord::from_capture(capture);
            if record.status > 399 {
                return Err(ApiError::CallFailed {
                    request: Box::new(request),
                    status: record.status,
                    body: String::from_utf8_lossy(&record.body).into_owned(),
                });
            }
            results.insert(slot, record.decoded()?);
        }
        Ok(results)
    }
}

#[async_trait]
impl<T: HttpTransport> HttpClient for MultiClient<T> {
    type Receipt = Submission;

    async fn http_get(
        &mut self,
        path: &str,
        query: &[(&str, &str)],
        headers: IndexMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<Submission, ApiError> {
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
        Ok(self.submit(request, timeout))
    }

    async fn http_post(
        &mut self,
        path: &str,
        content_type: &str,
        query: &[(&str, &str)],
        payload: Payload,
        headers: IndexMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<Submission, ApiError> {
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
        Ok(self.submit(request, timeout))
    }

    async fn http_put(
        &mut self,
        path: &str,
        content_type: &str,
        query: &[(&str, &str)],
        payload: Payload,
        headers: IndexMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<Submission, ApiError> {
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
        Ok(self.submit(request, timeout))
    }

    async fn http_delete(
        &mut self,
        path: &str,
        query: &[(&str, &str)],
        headers: IndexMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<Submission, ApiError> {
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
        Ok(self.submit(request, timeout))
    }
}
