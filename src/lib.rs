//! Asynchronous, load balanced Solr client.

// Core subsystems
pub mod client;
pub mod config;
pub mod error;
pub mod response;
pub mod transport;

// Traffic management
pub mod health;
pub mod load_balancer;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use client::{ClientBuilder, QueryContext, SolrClient, SolrQuery, SolrServer};
pub use config::ClientConfig;
pub use error::{SolrError, SolrResult, TransportError};
pub use load_balancer::LoadBalancer;
pub use resilience::{RetryDecision, RetryPolicy};
pub use response::QueryResponse;
