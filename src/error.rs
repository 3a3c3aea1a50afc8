//! Error taxonomy for the client.
//!
//! # Data Flow
//! ```text
//! transport (reqwest, custom)  → TransportError ─┐
//! codec (serde_json, custom)   → CodecError ─────┤
//!                                                 ▼
//!                                  SolrError (the only error type
//!                                  returned from SolrClient::query)
//! ```
//!
//! # Design Decisions
//! - `SolrError` is `Clone` so a failure can live in the query history and
//!   still be handed to the caller
//! - Foreign errors are translated where they enter the core, never later

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result alias used across the client.
pub type SolrResult<T> = Result<T, SolrError>;

/// Errors surfaced by the client.
#[derive(Debug, Clone, Error)]
pub enum SolrError {
    /// The load balancer had no server to offer. Never retried.
    #[error("{0}")]
    NoServerAvailable(String),

    /// Network or connection level failure.
    #[error("transport error: {0}")]
    Transport(#[source] Arc<TransportError>),

    /// The transport gave up waiting for a response.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The response content type did not match the codec.
    #[error("expected mime type {expected} but got {actual}")]
    MimeMismatch { expected: String, actual: String },

    /// Non-200 response or malformed body.
    #[error("remote error (HTTP {status}): {reason}")]
    Remote { status: u16, reason: String },

    /// The client was shut down before the query was issued.
    #[error("client has been shut down")]
    Closed,
}

impl SolrError {
    /// Build a remote protocol error.
    pub fn remote(status: u16, reason: impl Into<String>) -> Self {
        SolrError::Remote {
            status,
            reason: reason.into(),
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SolrError::Remote { status, .. } => Some(*status),
            SolrError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// True for failures that happened below the HTTP layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, SolrError::Transport(_) | SolrError::Timeout(_))
    }

    /// Translate the error into the shape handed to the caller once the
    /// retry policy gave up.
    ///
    /// A transport error that already carries an HTTP status becomes a
    /// [`SolrError::Remote`] with status and message preserved; everything
    /// else is returned unchanged.
    pub fn into_terminal(self) -> Self {
        match self {
            SolrError::Transport(e) => match e.as_ref() {
                TransportError::Status { status, message } => SolrError::remote(*status, message.clone()),
                _ => SolrError::Transport(e),
            },
            other => other,
        }
    }
}

/// Errors produced by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not connect to the server.
    #[error("connection failed: {0}")]
    Connect(String),

    /// No response within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The transport library rejected the response status itself.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Any other error raised by reqwest.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The transport was closed.
    #[error("transport is closed")]
    Closed,

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<TransportError> for SolrError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(after) => SolrError::Timeout(after),
            other => SolrError::Transport(Arc::new(other)),
        }
    }
}

/// Errors produced by a [`ResponseCodec`](crate::response::ResponseCodec).
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unsupported charset: {0}")]
    UnsupportedCharset(String),

    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
