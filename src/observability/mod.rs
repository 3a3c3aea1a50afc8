//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch engine and health observer produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms via a Metrics sink)
//!
//! Consumers:
//!     → stdout (fmt subscriber, binary only)
//!     → Metrics endpoint (Prometheus scrape, binary only)
//! ```
//!
//! # Design Decisions
//! - Every query carries a query id in its tracing span
//! - The default metrics sink is a no-op; recording is opt-in

pub mod logging;
pub mod metrics;

pub use metrics::{Metrics, NoopMetrics, RecorderMetrics};
