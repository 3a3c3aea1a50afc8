//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch engine picks a server
//!     → Transport::send(server, query, writer type)
//!     → HTTP GET <base><path>?<params>
//!     → RawResponse (any status) or TransportError
//! ```
//!
//! # Design Decisions
//! - The transport does not interpret status codes; that is the
//!   response handler's job
//! - Timeouts are enforced here and surfaced as `TransportError::Timeout`
//! - Exactly one result per `send`

pub mod http;

use async_trait::async_trait;
use std::fmt;

use crate::client::query::SolrQuery;
use crate::client::server::SolrServer;
use crate::error::TransportError;

pub use http::HttpTransport;

/// Raw HTTP response as received from a server.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// Canonical reason phrase for `status`, e.g. `Service Unavailable`.
    pub status_text: String,
    pub content_type: Option<String>,
    /// URL the request was sent to.
    pub url: String,
    pub body: Vec<u8>,
}

/// Sends a single query to a single server.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Issue one HTTP GET. Never blocks the calling thread.
    async fn send(
        &self,
        server: &SolrServer,
        query: &SolrQuery,
        writer_type: &str,
    ) -> Result<RawResponse, TransportError>;

    /// Release transport resources.
    fn close(&self) {}
}
