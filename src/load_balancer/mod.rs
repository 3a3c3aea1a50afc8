//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch engine needs a server
//!     → LoadBalancer::select_server(query)
//!         - single.rs (always the same server)
//!         - round_robin.rs (rotate through healthy servers)
//!     → pool.rs (registry + state.rs health per server)
//!     → Some(server) or None (no server available)
//!
//! Health observer
//!     → LoadBalancer::servers() → probe each
//!     → LoadBalancer::update_server_state(server, healthy)
//! ```
//!
//! # Design Decisions
//! - The dispatch engine only sees the trait; strategies are pluggable
//! - Unhealthy servers are excluded from selection
//! - Health state is per server, shared by every in-flight query

pub mod pool;
pub mod round_robin;
pub mod single;
pub mod state;

use std::fmt;
use std::sync::Arc;

use crate::client::query::SolrQuery;
use crate::client::server::SolrServer;

pub use pool::ServerPool;
pub use round_robin::RoundRobin;
pub use single::SingleServer;
pub use state::{HealthState, Thresholds};

/// Picks the server for the next attempt.
pub trait LoadBalancer: Send + Sync + fmt::Debug {
    /// Candidate server for `query`, or `None` when nothing is available.
    fn select_server(&self, query: &SolrQuery) -> Option<Arc<SolrServer>>;

    /// Every registered server, in registration order.
    fn servers(&self) -> Vec<Arc<SolrServer>>;

    /// Result of an out-of-band health check.
    fn update_server_state(&self, _server: &SolrServer, _healthy: bool) {}

    /// Whether `server` is currently eligible for selection.
    fn is_server_healthy(&self, _server: &SolrServer) -> bool {
        true
    }
}
