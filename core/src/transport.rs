//! Blocking executors for `HttpRequest` values.
//!
//! The client never calls a transport on an async worker: executions are
//! moved onto Tokio's blocking pool, so implementations are free to block.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Performs one HTTP round trip.
///
/// Non-2xx statuses are returned as data, not as `Err`; the client decides
/// what a status means. `Err` is reserved for failures where no response was
/// received at all.
pub trait Transport: Send + Sync + 'static {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `ureq` agent with status-code-as-error disabled so 4xx/5xx responses come
/// back as `HttpResponse`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut response = self
            .agent
            .get(request.url.as_str())
            .call()
            .map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
