//! Server registry.
//!
//! # Responsibilities
//! - Hold the servers a load balancer chooses from
//! - Track per-server health for selection and observation

use std::sync::Arc;

use crate::client::server::{ServerAddressError, SolrServer};
use crate::load_balancer::state::{ServerEntry, Thresholds};

/// Fixed set of servers with health state.
#[derive(Debug)]
pub struct ServerPool {
    entries: Vec<ServerEntry>,
    thresholds: Thresholds,
}

impl ServerPool {
    pub fn new(servers: Vec<Arc<SolrServer>>, thresholds: Thresholds) -> Self {
        Self {
            entries: servers.into_iter().map(ServerEntry::new).collect(),
            thresholds,
        }
    }

    /// Parse every address; fails on the first invalid one.
    pub fn from_addresses<S: AsRef<str>>(
        addresses: &[S],
        thresholds: Thresholds,
    ) -> Result<Self, ServerAddressError> {
        let servers = addresses
            .iter()
            .map(|a| SolrServer::new(a.as_ref()).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(servers, thresholds))
    }

    pub fn entries(&self) -> &[ServerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered servers, healthy or not.
    pub fn servers(&self) -> Vec<Arc<SolrServer>> {
        self.entries.iter().map(|e| e.server.clone()).collect()
    }

    pub fn entry(&self, server: &SolrServer) -> Option<&ServerEntry> {
        self.entries.iter().find(|e| e.server.as_ref() == server)
    }

    /// Feed an observation into the server's state machine.
    pub fn update(&self, server: &SolrServer, healthy: bool) {
        match self.entry(server) {
            Some(entry) if healthy => entry.mark_success(self.thresholds.healthy),
            Some(entry) => entry.mark_failure(self.thresholds.unhealthy),
            None => tracing::debug!(server = %server, "Ignoring state update for unknown server"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_addresses() {
        let pool = ServerPool::from_addresses(
            &["http://a:8983/solr/", "http://b:8983/solr"],
            Thresholds::default(),
        )
        .unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.servers()[0].base_url(), "http://a:8983/solr");

        assert!(ServerPool::from_addresses(&["nope"], Thresholds::default()).is_err());
    }

    #[test]
    fn test_update_unknown_server_ignored() {
        let pool = ServerPool::from_addresses(&["http://a:8983/solr"], Thresholds { healthy: 1, unhealthy: 1 }).unwrap();
        let other = SolrServer::new("http://z:8983/solr").unwrap();
        pool.update(&other, false);
        assert!(pool.entries()[0].is_healthy());

        let a = SolrServer::new("http://a:8983/solr").unwrap();
        pool.update(&a, false);
        assert!(!pool.entries()[0].is_healthy());
    }
}
