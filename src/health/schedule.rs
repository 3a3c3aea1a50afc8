//! Periodic scheduling of server state checks.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::health::observer::ServerStateObserver;
use crate::lifecycle::{Shutdown, ShutdownSignal};
use crate::load_balancer::LoadBalancer;

/// What to check, how often, and on which runtime.
#[derive(Clone)]
pub struct ServerStateObservation {
    pub observer: Arc<dyn ServerStateObserver>,
    pub check_interval: Duration,
    pub runtime: Handle,
}

impl ServerStateObservation {
    pub fn new(observer: Arc<dyn ServerStateObserver>, check_interval: Duration, runtime: Handle) -> Self {
        Self {
            observer,
            check_interval,
            runtime,
        }
    }

    /// Start checking `load_balancer`; the first check runs immediately.
    pub fn start(self, load_balancer: Arc<dyn LoadBalancer>) -> ScheduledObservation {
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        let handle = self
            .runtime
            .spawn(run(self.observer, self.check_interval, load_balancer, signal));

        ScheduledObservation { shutdown, handle }
    }
}

impl fmt::Debug for ServerStateObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerStateObservation")
            .field("observer", &self.observer)
            .field("check_interval", &self.check_interval)
            .finish()
    }
}

/// Handle to a running observation loop.
#[derive(Debug)]
pub struct ScheduledObservation {
    shutdown: Shutdown,
    handle: JoinHandle<()>,
}

impl ScheduledObservation {
    /// Stop scheduling further checks. A check already running completes.
    /// Returns `false` when already cancelled.
    pub fn cancel(&self) -> bool {
        self.shutdown.trigger()
    }

    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_triggered()
    }

    /// True once the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

async fn run(
    observer: Arc<dyn ServerStateObserver>,
    check_interval: Duration,
    load_balancer: Arc<dyn LoadBalancer>,
    mut shutdown: ShutdownSignal,
) {
    // tokio::time::interval rejects a zero period.
    let period = check_interval.max(Duration::from_millis(1));
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(interval = ?period, "Server state observation starting");

    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => {
                tracing::info!("Server state observation cancelled");
                break;
            }
            _ = ticker.tick() => {
                observer.check_server_state(load_balancer.as_ref()).await;
            }
        }
    }
}
