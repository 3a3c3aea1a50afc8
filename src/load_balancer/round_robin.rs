//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::client::query::SolrQuery;
use crate::client::server::SolrServer;
use crate::load_balancer::{pool::ServerPool, LoadBalancer};

/// Round-robin selector.
/// Stores an internal counter to rotate through healthy servers.
#[derive(Debug)]
pub struct RoundRobin {
    pool: ServerPool,
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new(pool: ServerPool) -> Self {
        Self {
            pool,
            counter: AtomicUsize::new(0),
        }
    }

    pub fn pool(&self) -> &ServerPool {
        &self.pool
    }
}

impl LoadBalancer for RoundRobin {
    fn select_server(&self, _query: &SolrQuery) -> Option<Arc<SolrServer>> {
        let entries = self.pool.entries();
        if entries.is_empty() {
            return None;
        }

        // One full lap at most; None when every server is unhealthy.
        let start = self.counter.fetch_add(1, Ordering::Relaxed);
        let len = entries.len();
        (0..len)
            .map(|i| &entries[start.wrapping_add(i) % len])
            .find(|e| e.is_healthy())
            .map(|e| e.server.clone())
    }

    fn servers(&self) -> Vec<Arc<SolrServer>> {
        self.pool.servers()
    }

    fn update_server_state(&self, server: &SolrServer, healthy: bool) {
        self.pool.update(server, healthy);
    }

    fn is_server_healthy(&self, server: &SolrServer) -> bool {
        self.pool.entry(server).is_some_and(|e| e.is_healthy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::Thresholds;

    fn lb() -> RoundRobin {
        let pool = ServerPool::from_addresses(
            &["http://a:8983/solr", "http://b:8983/solr"],
            Thresholds { healthy: 1, unhealthy: 1 },
        )
        .unwrap();
        RoundRobin::new(pool)
    }

    #[test]
    fn test_round_robin() {
        let lb = lb();
        let q = SolrQuery::new("*:*");

        let s1 = lb.select_server(&q).unwrap();
        let s2 = lb.select_server(&q).unwrap();
        let s3 = lb.select_server(&q).unwrap();
        assert_eq!(s1.base_url(), "http://a:8983/solr");
        assert_eq!(s2.base_url(), "http://b:8983/solr");
        assert_eq!(s3, s1);
    }

    #[test]
    fn test_skips_unhealthy() {
        let lb = lb();
        let q = SolrQuery::new("*:*");
        let a = SolrServer::new("http://a:8983/solr").unwrap();
        lb.update_server_state(&a, false);

        for _ in 0..4 {
            assert_eq!(lb.select_server(&q).unwrap().base_url(), "http://b:8983/solr");
        }
    }

    #[test]
    fn test_all_unhealthy() {
        let lb = lb();
        for s in lb.servers() {
            lb.update_server_state(&s, false);
        }
        assert!(lb.select_server(&SolrQuery::new("*:*")).is_none());
    }

    #[test]
    fn test_counter_wraparound() {
        let lb = lb();
        let q = SolrQuery::new("*:*");
        lb.counter.store(usize::MAX, Ordering::Relaxed);

        assert_eq!(lb.select_server(&q).unwrap().base_url(), "http://b:8983/solr");
        assert_eq!(lb.select_server(&q).unwrap().base_url(), "http://a:8983/solr");

        // An unhealthy server at the wrap point is still skipped.
        lb.counter.store(usize::MAX, Ordering::Relaxed);
        lb.update_server_state(&SolrServer::new("http://b:8983/solr").unwrap(), false);
        assert_eq!(lb.select_server(&q).unwrap().base_url(), "http://a:8983/solr");
    }

    #[test]
    fn test_reported_health_follows_state() {
        let lb = lb();
        let a = SolrServer::new("http://a:8983/solr").unwrap();
        assert!(lb.is_server_healthy(&a));
        lb.update_server_state(&a, false);
        assert!(!lb.is_server_healthy(&a));
        assert!(!lb.is_server_healthy(&SolrServer::new("http://zz:8983/solr").unwrap()));
    }

    #[test]
    fn test_empty_pool() {
        let lb = RoundRobin::new(ServerPool::new(Vec::new(), Thresholds::default()));
        assert!(lb.select_server(&SolrQuery::new("*:*")).is_none());
    }
}
