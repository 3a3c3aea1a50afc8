//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate server addresses
//! - Validate value ranges (timeouts > 0, thresholds > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::client::server::SolrServer;
use crate::config::schema::{ClientConfig, LoadBalancerStrategy, RetryPolicyKind};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `timeouts.request_secs`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Check a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.servers.is_empty() {
        errors.push(ValidationError::new("servers", "at least one server is required"));
    }
    for (i, addr) in config.servers.iter().enumerate() {
        if let Err(e) = SolrServer::new(addr) {
            errors.push(ValidationError::new(format!("servers[{}]", i), e.to_string()));
        }
    }
    if config.load_balancer.strategy == LoadBalancerStrategy::Single && config.servers.len() > 1 {
        errors.push(ValidationError::new(
            "load_balancer.strategy",
            "'single' accepts exactly one server",
        ));
    }

    if config.retries.policy == RetryPolicyKind::AtMost && config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be greater than 0"));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let hc = &config.health_check;
    if hc.enabled {
        if hc.interval_secs == 0 {
            errors.push(ValidationError::new("health_check.interval_secs", "must be greater than 0"));
        }
        if hc.timeout_secs == 0 {
            errors.push(ValidationError::new("health_check.timeout_secs", "must be greater than 0"));
        }
        if !hc.path.starts_with('/') {
            errors.push(ValidationError::new("health_check.path", "must start with '/'"));
        }
    }
    if hc.healthy_threshold == 0 {
        errors.push(ValidationError::new("health_check.healthy_threshold", "must be greater than 0"));
    }
    if hc.unhealthy_threshold == 0 {
        errors.push(ValidationError::new("health_check.unhealthy_threshold", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
