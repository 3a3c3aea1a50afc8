//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Build (SolrClient::builder().build()):
//!     Create transport (or take the supplied one) → Spawn health observation
//!
//! Shutdown (SolrClient::shutdown):
//!     shutdown.rs trigger → observation loop exits after any in-flight check
//!     → transport closed if the client created it
//! ```
//!
//! # Design Decisions
//! - Shutdown is idempotent
//! - Transport ownership is decided once, at build time

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownSignal};
