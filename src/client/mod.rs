//! Client core: query model, failure history and the dispatch engine.
//!
//! # Data Flow
//! ```text
//! caller → SolrClient::query (dispatch.rs)
//!     → LoadBalancer::select_server
//!     → interceptor.rs (optional) → Attempt::run
//!         → Transport::send → ResponseHandler::handle
//!     → on failure: context.rs append → RetryPolicy::should_retry
//!     → retry or terminal SolrError
//! ```

pub mod builder;
pub mod context;
pub mod dispatch;
pub mod interceptor;
pub mod query;
pub mod server;


pub use builder::{BuildError, ClientBuilder};
pub use context::{FailedRequest, QueryContext};
pub use dispatch::SolrClient;
pub use interceptor::{Attempt, RequestInterceptor};
pub use query::SolrQuery;
pub use server::{ServerAddressError, SolrServer};
