//! Query context: the query plus the history of failed attempts.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use crate::client::query::SolrQuery;
use crate::client::server::SolrServer;
use crate::error::SolrError;

/// One failed attempt.
#[derive(Debug, Clone)]
pub struct FailedRequest {
    pub server: Arc<SolrServer>,
    pub duration: Duration,
    pub error: SolrError,
}

impl FailedRequest {
    pub fn new(server: Arc<SolrServer>, duration: Duration, error: SolrError) -> Self {
        Self {
            server,
            duration,
            error,
        }
    }
}

/// Immutable accumulator threaded through the retry loop.
///
/// Failures are kept in attempt order. [`QueryContext::append`] returns a
/// new context; the receiver keeps its history.
#[derive(Debug, Clone)]
pub struct QueryContext {
    query: Arc<SolrQuery>,
    failed_requests: Arc<[FailedRequest]>,
}

impl QueryContext {
    pub fn new(query: SolrQuery) -> Self {
        Self {
            query: Arc::new(query),
            failed_requests: Arc::from(Vec::new()),
        }
    }

    pub fn query(&self) -> &SolrQuery {
        &self.query
    }

    /// Failed attempts, oldest first.
    pub fn failed_requests(&self) -> &[FailedRequest] {
        &self.failed_requests
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_requests.is_empty()
    }

    /// Servers that already failed for this query, oldest first.
    pub fn failed_servers(&self) -> impl Iterator<Item = &Arc<SolrServer>> {
        self.failed_requests.iter().map(|f| &f.server)
    }

    /// Context with `failed` appended to the history.
    pub fn append(&self, failed: FailedRequest) -> QueryContext {
        let mut history = Vec::with_capacity(self.failed_requests.len() + 1);
        history.extend_from_slice(&self.failed_requests);
        history.push(failed);
        QueryContext {
            query: self.query.clone(),
            failed_requests: Arc::from(history),
        }
    }

    /// Bulleted, one entry per failed attempt; multi-line errors are
    /// indented under their bullet.
    pub fn failure_report(&self) -> String {
        let mut report = String::new();
        for (i, f) in self.failed_requests.iter().enumerate() {
            if i > 0 {
                report.push('\n');
            }
            let error = f.error.to_string();
            let mut lines = error.lines().filter(|l| !l.trim().is_empty());
            let _ = write!(
                report,
                "- {} failed after {}ms: {}",
                f.server,
                f.duration.as_millis(),
                lines.next().unwrap_or_default()
            );
            // Continuation lines of a multi-line error stay under their bullet.
            for line in lines {
                let _ = write!(report, "\n  {line}");
            }
        }
        report
    }

    /// Terminal error for an exhausted load balancer.
    pub fn no_server_available(&self) -> SolrError {
        if self.has_failures() {
            SolrError::NoServerAvailable(format!(
                "No solr server available, failed requests:\n{}",
                self.failure_report()
            ))
        } else {
            SolrError::NoServerAvailable("No solr server available.".to_string())
        }
    }
}
