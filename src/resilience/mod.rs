//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Attempt against a server fails:
//!     → FailedRequest appended to the QueryContext
//!     → retries.rs (RetryPolicy::should_retry)
//!     → RetryServer(s) | Retry | Fail back to the dispatch engine
//! ```
//!
//! # Design Decisions
//! - Timeouts are enforced by the transport, not here
//! - Termination of the retry loop is entirely the policy's job

pub mod retries;

pub use retries::{AtMost, RetryDecision, RetryPolicy, TryAvailableServers, TryNextServer, TryOnce};
