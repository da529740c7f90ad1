//! Request builder, fetch helper and response parser for the JSONPlaceholder API.
//!
//! # Design
//! `JphClient` holds the base URL and a shared [`Transport`]. Building a
//! request and parsing a response are pure functions; [`JphClient::fetch`]
//! glues them together with one transport round trip on the blocking pool.
//! There is no retry, no cache and no timeout beyond the transport's default.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Comment, Post};

/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct JphClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for JphClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JphClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl JphClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            transport,
        })
    }

    /// Client talking to `config.base_url` over [`UreqTransport`].
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.base_url, Arc::new(UreqTransport::new()))
    }

    /// Replace the base URL's path with `/{path}` and append `params` as
    /// query items. No params means no query string at all.
    pub fn build_request(&self, path: &str, params: &BTreeMap<String, String>) -> HttpRequest {
        let mut url = self.base_url.clone();
        url.set_path(&format!("/{}", path.trim_start_matches('/')));
        url.set_query(None);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        HttpRequest { url }
    }

    pub fn build_list_posts(&self) -> HttpRequest {
        self.build_request("posts", &BTreeMap::new())
    }

    pub fn build_list_comments(&self, post_id: i64) -> HttpRequest {
        let params = BTreeMap::from([("postId".to_string(), post_id.to_string())]);
        self.build_request("comments", &params)
    }

    /// Build, execute and decode in one step.
    pub async fn fetch<T>(&self, path: &str, params: &BTreeMap<String, String>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.execute(self.build_request(path, params)).await
    }

    /// Run `request` on the blocking pool and decode the response.
    ///
    /// Must be awaited inside a Tokio runtime.
    pub async fn execute<T>(&self, request: HttpRequest) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(url = %request.url, "fetch started");
        let transport = Arc::clone(&self.transport);
        let outcome = tokio::task::spawn_blocking(move || transport.execute(&request)).await;

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "transport failed");
                return Err(e.into());
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetch worker finished without output");
                return Err(ApiError::MissingOutput);
            }
        };

        tracing::debug!(status = response.status, "fetch finished");
        parse_json(response)
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.execute(self.build_list_posts()).await
    }

    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, ApiError> {
        self.execute(self.build_list_comments(post_id)).await
    }
}

/// Decode a 2xx JSON body into `T`.
pub fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_slice(&response.body).map_err(|e| {
        tracing::warn!(error = %e, "response did not match the expected shape");
        ApiError::Decode(e.to_string())
    })
}

/// Map non-success status codes to `ApiError::Status`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(ApiError::Status {
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    })
}
