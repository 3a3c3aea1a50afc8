//! Retry policies.
//!
//! # Responsibilities
//! - Decide, after a failed attempt, whether and where to try again
//! - Bound the number of attempts (the dispatch engine does not)
//!
//! # Design Decisions
//! - Decisions are a closed enum so the dispatch loop stays exhaustive
//! - Policies are stateless; everything they need is in the QueryContext
//! - "No server available" never reaches a policy

use std::fmt;
use std::sync::Arc;

use crate::client::context::QueryContext;
use crate::client::server::SolrServer;
use crate::error::SolrError;
use crate::load_balancer::LoadBalancer;

/// What to do after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again on this server, skipping load balancer selection.
    RetryServer(Arc<SolrServer>),
    /// Ask the load balancer for a server again.
    Retry,
    /// Give up and surface the error.
    Fail,
}

/// Decides whether a failed attempt is retried.
pub trait RetryPolicy: Send + Sync + fmt::Debug {
    /// `context` already contains the failure of `server`.
    fn should_retry(
        &self,
        error: &SolrError,
        server: &SolrServer,
        context: &QueryContext,
        load_balancer: &dyn LoadBalancer,
    ) -> RetryDecision;
}

/// Never retries.
#[derive(Debug, Default, Clone, Copy)]
pub struct TryOnce;

impl RetryPolicy for TryOnce {
    fn should_retry(
        &self,
        _error: &SolrError,
        _server: &SolrServer,
        _context: &QueryContext,
        _load_balancer: &dyn LoadBalancer,
    ) -> RetryDecision {
        RetryDecision::Fail
    }
}

/// Retries through the load balancer until as many attempts failed as
/// there are registered servers.
#[derive(Debug, Default, Clone, Copy)]
pub struct TryAvailableServers;

impl RetryPolicy for TryAvailableServers {
    fn should_retry(
        &self,
        _error: &SolrError,
        _server: &SolrServer,
        context: &QueryContext,
        load_balancer: &dyn LoadBalancer,
    ) -> RetryDecision {
        if context.failed_requests().len() < load_balancer.servers().len() {
            RetryDecision::Retry
        } else {
            RetryDecision::Fail
        }
    }
}

/// Retries through the load balancer until `max_failures` attempts failed.
#[derive(Debug, Clone, Copy)]
pub struct AtMost {
    max_failures: usize,
}

impl AtMost {
    pub fn new(max_failures: usize) -> Self {
        Self { max_failures }
    }
}

impl RetryPolicy for AtMost {
    fn should_retry(
        &self,
        _error: &SolrError,
        _server: &SolrServer,
        context: &QueryContext,
        _load_balancer: &dyn LoadBalancer,
    ) -> RetryDecision {
        if context.failed_requests().len() < self.max_failures {
            RetryDecision::Retry
        } else {
            RetryDecision::Fail
        }
    }
}

/// Walks the registry ring starting after the failed server, picking the
/// first server that has not failed for this query yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct TryNextServer;

impl RetryPolicy for TryNextServer {
    fn should_retry(
        &self,
        _error: &SolrError,
        server: &SolrServer,
        context: &QueryContext,
        load_balancer: &dyn LoadBalancer,
    ) -> RetryDecision {
        let servers = load_balancer.servers();
        let start = servers
            .iter()
            .position(|s| s.as_ref() == server)
            .map_or(0, |i| i + 1);

        (0..servers.len())
            .map(|i| &servers[(start + i) % servers.len()])
            .find(|candidate| context.failed_servers().all(|failed| failed != *candidate))
            .map_or(RetryDecision::Fail, |next| RetryDecision::RetryServer(next.clone()))
    }
}
