//! Active server state observation.
//!
//! # Responsibilities
//! - Probe every registered server
//! - Report results to the load balancer's health state

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use crate::client::query::USER_AGENT as CLIENT_USER_AGENT;
use crate::client::server::SolrServer;
use crate::config::HealthCheckConfig;
use crate::error::TransportError;
use crate::load_balancer::LoadBalancer;
use crate::observability::metrics;

/// Checks servers out of band and feeds the load balancer.
#[async_trait]
pub trait ServerStateObserver: Send + Sync + fmt::Debug {
    async fn check_server_state(&self, load_balancer: &dyn LoadBalancer);
}

/// Pings `<base_url><path>` on every server; 2xx is healthy.
#[derive(Debug, Clone)]
pub struct PingStatusObserver {
    client: Client,
    path: String,
    timeout: Duration,
}

impl PingStatusObserver {
    pub fn new(client: Client, path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            path: path.into(),
            timeout,
        }
    }

    /// Observer with its own HTTP client.
    pub fn from_config(config: &HealthCheckConfig) -> Result<Self, TransportError> {
        let client = Client::builder().build()?;
        Ok(Self::new(
            client,
            config.path.clone(),
            Duration::from_secs(config.timeout_secs),
        ))
    }

    async fn ping(&self, server: &SolrServer) -> bool {
        let url = format!("{}{}", server.base_url(), self.path);
        let request = self.client.get(&url).header(USER_AGENT, CLIENT_USER_AGENT).send();

        match time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => {
                let success = response.status().is_success();
                if !success {
                    tracing::warn!(server = %server, status = %response.status(), "Ping failed: non-success status");
                }
                success
            }
            Ok(Err(e)) => {
                tracing::warn!(server = %server, error = %e, "Ping failed: connection error");
                false
            }
            Err(_) => {
                tracing::warn!(server = %server, "Ping failed: timeout");
                false
            }
        }
    }
}

#[async_trait]
impl ServerStateObserver for PingStatusObserver {
    async fn check_server_state(&self, load_balancer: &dyn LoadBalancer) {
        let servers: Vec<Arc<SolrServer>> = load_balancer.servers();
        let results = join_all(servers.iter().map(|s| self.ping(s))).await;

        for (server, ping_ok) in servers.iter().zip(results) {
            report(load_balancer, server, ping_ok);
        }
    }
}

/// Feed one ping result to the balancer and publish the resulting state.
fn report(load_balancer: &dyn LoadBalancer, server: &SolrServer, ping_ok: bool) {
    load_balancer.update_server_state(server, ping_ok);
    metrics::record_server_health(server.base_url(), load_balancer.is_server_healthy(server));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::{RoundRobin, ServerPool, Thresholds};
    use ::metrics::{
        Counter, Gauge, GaugeFn, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
    };
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct LastValue(Mutex<Option<f64>>);

    impl GaugeFn for LastValue {
        fn increment(&self, _value: f64) {}

        fn decrement(&self, _value: f64) {}

        fn set(&self, value: f64) {
            *self.0.lock().unwrap() = Some(value);
        }
    }

    /// Captures the health gauge only.
    #[derive(Debug, Default)]
    struct HealthRecorder {
        gauge: Arc<LastValue>,
    }

    impl Recorder for HealthRecorder {
        fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

        fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

        fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

        fn register_counter(&self, _key: &Key, _metadata: &Metadata<'_>) -> Counter {
            Counter::noop()
        }

        fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
            if key.name() == "solr_client_server_health" {
                Gauge::from_arc(self.gauge.clone())
            } else {
                Gauge::noop()
            }
        }

        fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    fn gauge_after(lb: &RoundRobin, server: &SolrServer, ping_ok: bool) -> Option<f64> {
        let recorder = HealthRecorder::default();
        ::metrics::with_local_recorder(&recorder, || report(lb, server, ping_ok));
        let value = *recorder.gauge.0.lock().unwrap();
        value
    }

    #[test]
    fn test_gauge_follows_hysteresis() {
        let lb = RoundRobin::new(
            ServerPool::from_addresses(
                &["http://a:8983/solr"],
                Thresholds { healthy: 2, unhealthy: 2 },
            )
            .unwrap(),
        );
        let a = SolrServer::new("http://a:8983/solr").unwrap();

        // One failed ping is below the threshold; still selectable.
        assert_eq!(gauge_after(&lb, &a, false), Some(1.0));
        assert_eq!(gauge_after(&lb, &a, false), Some(0.0));
        // One success is not enough to come back.
        assert_eq!(gauge_after(&lb, &a, true), Some(0.0));
        assert_eq!(gauge_after(&lb, &a, true), Some(1.0));
    }
}
