//! Error types for the JSONPlaceholder client.
//!
//! # Design
//! Every fetch failure is turned into a value and handed to the screen as a
//! failure event, so `ApiError` is `Clone + Eq` and lives inside state values.
//! Causes are kept as rendered strings for that reason.

use thiserror::Error;

/// Errors produced by the fetch helper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The response body did not match the expected shape.
    #[error("decoding failed: {0}")]
    Decode(String),

    /// The fetch finished without data and without an error from the transport.
    #[error("output is missing, please check the url")]
    MissingOutput,

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The base address could not be parsed as a URL.
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
}

/// Failure reported by a [`Transport`](crate::transport::Transport) before any
/// response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
