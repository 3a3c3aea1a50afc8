//! Request interception around single attempts.

use async_trait::async_trait;
use std::fmt;
use std::time::Instant;

use crate::client::dispatch::ClientInner;
use crate::client::query::SolrQuery;
use crate::client::server::SolrServer;
use crate::error::SolrResult;
use crate::response::QueryResponse;

/// One physical attempt: send, validate, decode.
///
/// Handed to a [`RequestInterceptor`], which decides if, when and with which
/// query it runs.
#[derive(Clone, Copy)]
pub struct Attempt<'a> {
    inner: &'a ClientInner,
}

impl<'a> Attempt<'a> {
    pub(crate) fn new(inner: &'a ClientInner) -> Self {
        Self { inner }
    }

    /// Send `query` to `server` and process the response.
    pub async fn run(&self, server: &SolrServer, query: &SolrQuery) -> SolrResult<QueryResponse> {
        let started = Instant::now();
        let writer_type = self.inner.responses.codec().writer_type();

        match self.inner.transport.send(server, query, writer_type).await {
            Ok(raw) => self.inner.responses.handle(&raw, started),
            Err(e) => {
                self.inner.metrics.count_transport_exception();
                Err(e.into())
            }
        }
    }
}

impl fmt::Debug for Attempt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attempt").finish_non_exhaustive()
    }
}

/// Wraps every attempt. May short-circuit, delay or rewrite the call.
#[async_trait]
pub trait RequestInterceptor: Send + Sync + fmt::Debug {
    async fn intercept(
        &self,
        attempt: Attempt<'_>,
        server: &SolrServer,
        query: &SolrQuery,
    ) -> SolrResult<QueryResponse>;
}
