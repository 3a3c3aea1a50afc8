//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! schedule.rs:
//!     Periodic timer (tokio interval on the configured runtime)
//!     → observer.rs ServerStateObserver::check_server_state
//!     → LoadBalancer::update_server_state per server
//!     → load_balancer/state.rs hysteresis
//! ```
//!
//! # Design Decisions
//! - The only long-lived background task of the client
//! - Cancelling stops future ticks; a running check completes
//! - Dropping the handle also ends the loop

pub mod observer;
pub mod schedule;

pub use observer::{PingStatusObserver, ServerStateObserver};
pub use schedule::{ScheduledObservation, ServerStateObservation};
