//! Single server strategy.

use std::sync::Arc;

use crate::client::query::SolrQuery;
use crate::client::server::SolrServer;
use crate::load_balancer::LoadBalancer;

/// Always returns the same server, regardless of health.
#[derive(Debug, Clone)]
pub struct SingleServer {
    server: Arc<SolrServer>,
}

impl SingleServer {
    pub fn new(server: SolrServer) -> Self {
        Self {
            server: Arc::new(server),
        }
    }
}

impl LoadBalancer for SingleServer {
    fn select_server(&self, _query: &SolrQuery) -> Option<Arc<SolrServer>> {
        Some(self.server.clone())
    }

    fn servers(&self) -> Vec<Arc<SolrServer>> {
        vec![self.server.clone()]
    }
}
