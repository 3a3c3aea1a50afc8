//! Query dispatch with load balancing and retries.
//!
//! # Flow
//! ```text
//! query(q)
//!   └─ Select ── load balancer ── None ──────────────▶ NoServerAvailable
//!        │                         │
//!        │                      Some(s)
//!        ▼                         ▼
//!   Attempt(s) ── transport + response handler ── Ok ─▶ QueryResponse
//!        │ Err(e)
//!        ▼
//!   context = context.append(FailedRequest(s, elapsed, e))
//!   retry policy:
//!     RetryServer(s2) → Attempt(s2)
//!     Retry           → Select
//!     Fail            → e.into_terminal()
//! ```
//!
//! The loop carries no counter; the history in the context is all the
//! state there is, and the retry policy alone decides when to stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::client::builder::ClientBuilder;
use crate::client::context::{FailedRequest, QueryContext};
use crate::client::interceptor::{Attempt, RequestInterceptor};
use crate::client::query::SolrQuery;
use crate::client::server::SolrServer;
use crate::error::{SolrError, SolrResult};
use crate::health::ScheduledObservation;
use crate::load_balancer::LoadBalancer;
use crate::observability::Metrics;
use crate::resilience::{RetryDecision, RetryPolicy};
use crate::response::{QueryResponse, ResponseHandler};
use crate::transport::Transport;

/// Next move of the dispatch loop.
enum Step {
    Select,
    Attempt(Arc<SolrServer>),
}

#[derive(Debug)]
pub(crate) struct ClientInner {
    pub(crate) load_balancer: Arc<dyn LoadBalancer>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) owns_transport: bool,
    pub(crate) responses: ResponseHandler,
    pub(crate) metrics: Arc<dyn Metrics>,
    pub(crate) retry_policy: Arc<dyn RetryPolicy>,
    pub(crate) interceptor: Option<Arc<dyn RequestInterceptor>>,
    pub(crate) observation: Option<ScheduledObservation>,
    pub(crate) closed: AtomicBool,
}

/// Asynchronous, load balanced Solr client.
///
/// Cheap to clone; clones share the transport, load balancer and health
/// observation.
#[derive(Debug, Clone)]
pub struct SolrClient {
    inner: Arc<ClientInner>,
}

impl SolrClient {
    pub(crate) fn from_inner(inner: ClientInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Start building a client around `load_balancer`.
    pub fn builder(load_balancer: Arc<dyn LoadBalancer>) -> ClientBuilder {
        ClientBuilder::new(load_balancer)
    }

    pub fn load_balancer(&self) -> &Arc<dyn LoadBalancer> {
        &self.inner.load_balancer
    }

    /// Whether [`SolrClient::shutdown`] will close the transport.
    pub fn owns_transport(&self) -> bool {
        self.inner.owns_transport
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Run `query` against the cluster.
    ///
    /// Intermediate failures are only visible in logs and metrics; the
    /// returned future resolves to the response or to one terminal error.
    pub async fn query(&self, query: SolrQuery) -> SolrResult<QueryResponse> {
        if self.is_shut_down() {
            return Err(SolrError::Closed);
        }

        let span = tracing::debug_span!("solr_query", query_id = %Uuid::new_v4());
        self.inner.dispatch(QueryContext::new(query)).instrument(span).await
    }

    /// Cancel health observation and close the transport if this client
    /// created it. Safe to call more than once.
    pub fn shutdown(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        if let Some(observation) = &self.inner.observation {
            observation.cancel();
        }
        if self.inner.owns_transport {
            self.inner.transport.close();
        }

        tracing::info!(owns_transport = self.inner.owns_transport, "Solr client shut down");
    }
}

impl ClientInner {
    async fn dispatch(&self, mut context: QueryContext) -> SolrResult<QueryResponse> {
        let mut step = Step::Select;

        loop {
            let server = match step {
                Step::Select => match self.load_balancer.select_server(context.query()) {
                    Some(server) => {
                        if context.has_failures() {
                            tracing::warn!(server = %server, "Retrying query on server chosen by load balancer");
                        }
                        server
                    }
                    None => {
                        let error = context.no_server_available();
                        tracing::warn!(failed_requests = context.failed_requests().len(), "No solr server available");
                        return Err(error);
                    }
                },
                Step::Attempt(server) => server,
            };

            let started = Instant::now();
            let error = match self.attempt(&server, context.query()).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            context = context.append(FailedRequest::new(server.clone(), started.elapsed(), error.clone()));

            step = match self.retry_policy.should_retry(&error, &server, &context, self.load_balancer.as_ref()) {
                RetryDecision::RetryServer(next) => {
                    tracing::warn!(server = %server, retry_server = %next, error = %error, "Query failed, retrying on server");
                    Step::Attempt(next)
                }
                RetryDecision::Retry => {
                    tracing::warn!(server = %server, error = %error, "Query failed, retrying via load balancer");
                    Step::Select
                }
                RetryDecision::Fail => {
                    tracing::warn!(
                        server = %server,
                        error = %error,
                        failed_requests = context.failed_requests().len(),
                        "Query failed, not retrying"
                    );
                    return Err(error.into_terminal());
                }
            };
        }
    }

    async fn attempt(&self, server: &SolrServer, query: &SolrQuery) -> SolrResult<QueryResponse> {
        let attempt = Attempt::new(self);
        match &self.interceptor {
            Some(interceptor) => interceptor.intercept(attempt, server, query).await,
            None => attempt.run(server, query).await,
        }
    }
}
