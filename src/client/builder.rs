//! Client construction.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;

use crate::client::dispatch::{ClientInner, SolrClient};
use crate::client::interceptor::RequestInterceptor;
use crate::client::server::{ServerAddressError, SolrServer};
use crate::config::validation::validate_config;
use crate::config::{ClientConfig, ConfigError, LoadBalancerStrategy, RetryPolicyKind, TimeoutConfig};
use crate::error::TransportError;
use crate::health::{PingStatusObserver, ServerStateObservation};
use crate::load_balancer::{LoadBalancer, RoundRobin, ServerPool, SingleServer, Thresholds};
use crate::observability::{Metrics, NoopMetrics, RecorderMetrics};
use crate::resilience::{AtMost, RetryPolicy, TryAvailableServers, TryNextServer, TryOnce};
use crate::response::{JsonCodec, ResponseCodec, ResponseHandler};
use crate::transport::{HttpTransport, Transport};

/// Errors raised while building a client.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    InvalidServer(#[from] ServerAddressError),

    #[error("failed to create HTTP transport: {0}")]
    Transport(#[from] TransportError),

    #[error("health checks need a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Builder for [`SolrClient`].
///
/// Only the load balancer is required. Defaults: an owned
/// [`HttpTransport`], [`JsonCodec`], [`NoopMetrics`], [`TryOnce`], no
/// interceptor and no health observation.
#[derive(Debug)]
pub struct ClientBuilder {
    load_balancer: Arc<dyn LoadBalancer>,
    transport: Option<Arc<dyn Transport>>,
    interceptor: Option<Arc<dyn RequestInterceptor>>,
    codec: Option<Arc<dyn ResponseCodec>>,
    metrics: Option<Arc<dyn Metrics>>,
    observation: Option<ServerStateObservation>,
    retry_policy: Option<Arc<dyn RetryPolicy>>,
    timeouts: TimeoutConfig,
}

impl ClientBuilder {
    pub fn new(load_balancer: Arc<dyn LoadBalancer>) -> Self {
        Self {
            load_balancer,
            transport: None,
            interceptor: None,
            codec: None,
            metrics: None,
            observation: None,
            retry_policy: None,
            timeouts: TimeoutConfig::default(),
        }
    }

    /// Use an externally owned transport. [`SolrClient::shutdown`] leaves it open.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn codec(mut self, codec: Arc<dyn ResponseCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn metrics(mut self, metrics: Arc<dyn Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn server_state_observation(mut self, observation: ServerStateObservation) -> Self {
        self.observation = Some(observation);
        self
    }

    pub fn retry_policy(mut self, policy: Arc<dyn RetryPolicy>) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Timeouts of the transport created by the builder.
    pub fn timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Create the transport if none was supplied and start health observation.
    pub fn build(self) -> Result<SolrClient, BuildError> {
        let (transport, owns_transport): (Arc<dyn Transport>, bool) = match self.transport {
            Some(transport) => (transport, false),
            None => {
                let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&self.timeouts)?);
                (transport, true)
            }
        };

        let metrics = self.metrics.unwrap_or_else(|| Arc::new(NoopMetrics));
        let codec = self.codec.unwrap_or_else(|| Arc::new(JsonCodec));
        let observation = self
            .observation
            .map(|observation| observation.start(self.load_balancer.clone()));

        Ok(SolrClient::from_inner(ClientInner {
            load_balancer: self.load_balancer,
            transport,
            owns_transport,
            responses: ResponseHandler::new(codec, metrics.clone()),
            metrics,
            retry_policy: self.retry_policy.unwrap_or_else(|| Arc::new(TryOnce)),
            interceptor: self.interceptor,
            observation,
            closed: AtomicBool::new(false),
        }))
    }
}

impl SolrClient {
    /// Wire a client from a configuration file's contents.
    ///
    /// Health checks are spawned on the current tokio runtime.
    pub fn from_config(config: &ClientConfig) -> Result<SolrClient, BuildError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let hc = &config.health_check;
        let thresholds = Thresholds {
            healthy: hc.healthy_threshold as usize,
            unhealthy: hc.unhealthy_threshold as usize,
        };

        let load_balancer: Arc<dyn LoadBalancer> = match config.load_balancer.strategy {
            LoadBalancerStrategy::Single => {
                let server = SolrServer::new(&config.servers[0])?;
                Arc::new(SingleServer::new(server))
            }
            LoadBalancerStrategy::RoundRobin => {
                Arc::new(RoundRobin::new(ServerPool::from_addresses(config.servers.as_slice(), thresholds)?))
            }
        };

        let retry_policy: Arc<dyn RetryPolicy> = match config.retries.policy {
            RetryPolicyKind::TryOnce => Arc::new(TryOnce),
            RetryPolicyKind::TryAvailableServers => Arc::new(TryAvailableServers),
            RetryPolicyKind::AtMost => Arc::new(AtMost::new(config.retries.max_attempts as usize)),
            RetryPolicyKind::TryNextServer => Arc::new(TryNextServer),
        };

        let metrics: Arc<dyn Metrics> = if config.observability.metrics_enabled {
            Arc::new(RecorderMetrics)
        } else {
            Arc::new(NoopMetrics)
        };

        let mut builder = ClientBuilder::new(load_balancer)
            .retry_policy(retry_policy)
            .metrics(metrics)
            .timeouts(config.timeouts.clone());

        if hc.enabled {
            let observer = Arc::new(PingStatusObserver::from_config(hc)?);
            builder = builder.server_state_observation(ServerStateObservation::new(
                observer,
                Duration::from_secs(hc.interval_secs),
                Handle::try_current()?,
            ));
        }

        tracing::info!(
            servers = config.servers.len(),
            strategy = ?config.load_balancer.strategy,
            retry_policy = ?config.retries.policy,
            health_check = hc.enabled,
            "Building solr client"
        );

        builder.build()
    }
}
