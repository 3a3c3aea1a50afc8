//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define the metrics sink the dispatch engine reports into
//! - Provide a no-op sink and one backed by the `metrics` facade
//! - Expose a Prometheus-compatible endpoint for the binary
//!
//! # Metrics
//! - `solr_client_request_duration_seconds` (histogram): successful request latency
//! - `solr_client_remote_errors_total` (counter): invalid or non-200 responses
//! - `solr_client_transport_errors_total` (counter): connection level failures
//! - `solr_client_server_health` (gauge): 1=healthy, 0=unhealthy, per server
//!
//! # Design Decisions
//! - Sinks must tolerate concurrent calls from any number of queries
//! - Recording never fails and never blocks

use metrics_exporter_prometheus::PrometheusBuilder;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// Side-effect hook invoked by the dispatch engine.
pub trait Metrics: Send + Sync + fmt::Debug {
    /// Latency of a successful attempt, decode included.
    fn request_time(&self, elapsed: Duration);

    /// An attempt produced an invalid or non-200 response.
    fn count_remote_exception(&self);

    /// An attempt failed below the HTTP layer.
    fn count_transport_exception(&self);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn request_time(&self, _elapsed: Duration) {}
    fn count_remote_exception(&self) {}
    fn count_transport_exception(&self) {}
}

/// Reports through the global `metrics` recorder.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecorderMetrics;

impl Metrics for RecorderMetrics {
    fn request_time(&self, elapsed: Duration) {
        metrics::histogram!("solr_client_request_duration_seconds").record(elapsed.as_secs_f64());
    }

    fn count_remote_exception(&self) {
        metrics::counter!("solr_client_remote_errors_total").increment(1);
    }

    fn count_transport_exception(&self) {
        metrics::counter!("solr_client_transport_errors_total").increment(1);
    }
}

/// Record the observed health of a server.
pub fn record_server_health(server: &str, healthy: bool) {
    metrics::gauge!("solr_client_server_health", "server" => server.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Counts every call, for assertions in tests.
    #[derive(Debug, Default)]
    pub struct CountingMetrics {
        pub remote: AtomicUsize,
        pub transport: AtomicUsize,
        pub latencies: Mutex<Vec<Duration>>,
    }

    impl CountingMetrics {
        pub fn remote(&self) -> usize {
            self.remote.load(Ordering::SeqCst)
        }

        pub fn transport(&self) -> usize {
            self.transport.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> usize {
            self.latencies.lock().unwrap().len()
        }
    }

    impl Metrics for CountingMetrics {
        fn request_time(&self, elapsed: Duration) {
            self.latencies.lock().unwrap().push(elapsed);
        }

        fn count_remote_exception(&self) {
            self.remote.fetch_add(1, Ordering::SeqCst);
        }

        fn count_transport_exception(&self) {
            self.transport.fetch_add(1, Ordering::SeqCst);
        }
    }
}
