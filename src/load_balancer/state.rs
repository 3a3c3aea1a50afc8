//! Per-server health state.
//!
//! # State Transitions
//! ```text
//! Unknown/Healthy → Unhealthy: consecutive failures >= unhealthy_threshold
//! Unknown/Unhealthy → Healthy: consecutive successes >= healthy_threshold
//! ```
//!
//! Counters are plain atomics; any number of queries and the health
//! observer may update them concurrently.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::client::server::SolrServer;

/// Health State enum.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Unknown = 0,
    Healthy = 1,
    Unhealthy = 2,
}

impl From<u8> for HealthState {
    fn from(val: u8) -> Self {
        match val {
            1 => HealthState::Healthy,
            2 => HealthState::Unhealthy,
            _ => HealthState::Unknown,
        }
    }
}

/// Hysteresis thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub healthy: usize,
    pub unhealthy: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            healthy: 2,
            unhealthy: 3,
        }
    }
}

/// A registered server and its health.
#[derive(Debug)]
pub struct ServerEntry {
    pub server: Arc<SolrServer>,
    state: AtomicU8,
    consecutive_failures: AtomicUsize,
    consecutive_successes: AtomicUsize,
}

impl ServerEntry {
    pub fn new(server: Arc<SolrServer>) -> Self {
        Self {
            server,
            state: AtomicU8::new(HealthState::Unknown as u8),
            consecutive_failures: AtomicUsize::new(0),
            consecutive_successes: AtomicUsize::new(0),
        }
    }

    pub fn state(&self) -> HealthState {
        HealthState::from(self.state.load(Ordering::Relaxed))
    }

    /// Healthy or not yet checked.
    pub fn is_healthy(&self) -> bool {
        self.state() != HealthState::Unhealthy
    }

    /// Report a successful check.
    pub fn mark_success(&self, healthy_threshold: usize) {
        self.consecutive_failures.store(0, Ordering::Relaxed);

        if self.state() == HealthState::Healthy {
            return;
        }

        let successes = self.consecutive_successes.fetch_add(1, Ordering::Relaxed) + 1;
        if successes >= healthy_threshold {
            self.state.store(HealthState::Healthy as u8, Ordering::Relaxed);
            self.consecutive_successes.store(0, Ordering::Relaxed);
            tracing::info!(server = %self.server, "Server marked healthy");
        }
    }

    /// Report a failed check.
    pub fn mark_failure(&self, unhealthy_threshold: usize) {
        self.consecutive_successes.store(0, Ordering::Relaxed);

        if self.state() == HealthState::Unhealthy {
            return;
        }

        let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= unhealthy_threshold {
            self.state.store(HealthState::Unhealthy as u8, Ordering::Relaxed);
            self.consecutive_failures.store(0, Ordering::Relaxed);
            tracing::warn!(server = %self.server, "Server marked unhealthy");
        }
    }
}
