//! In-process event loop service
//!
//! Provides the service constructor that resolves options once and the
//! poller state that the tuning handle drives before the loop starts.

mod event_loop;
mod poller;

pub use event_loop::EventLoop;
pub use poller::PollerState;

/// Number of cores served by one poller
pub const CORES_PER_LOOP: usize = 20;

/// Default number of pollers for a machine with `cores` cores
#[must_use]
pub fn default_num_loops(cores: usize) -> usize {
    cores / CORES_PER_LOOP + 1
}
