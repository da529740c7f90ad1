//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The client builds `HttpRequest`
//! values and parses `HttpResponse` values; a [`Transport`](crate::transport::Transport)
//! performs the round trip in between. Every request is a GET without custom
//! headers, so a request is fully described by its URL.

use url::Url;

/// A GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: Url,
}

impl HttpRequest {
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Query items in the order they appear in the URL.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

/// An HTTP response described as plain data. The body is kept as raw bytes;
/// decoding it is the client's job.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}
