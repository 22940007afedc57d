//! Process-wide poller tuning
//!
//! The engine owns poller state. [`Tuning`] is a thin handle over the engine's
//! [`PollerTuning`] surface: every call forwards its argument and the engine's
//! result unchanged. How many loops run, how connections are spread across
//! them and whether request dispatch uses a pool is decided by the engine.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Strategy used to distribute new connections between pollers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadBalance {
    /// Pick a poller at random
    Random,
    /// Rotate through pollers in order
    #[default]
    RoundRobin,
}

impl fmt::Display for LoadBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::RoundRobin => f.write_str("round_robin"),
        }
    }
}

/// Tuning surface implemented by the event-loop engine
pub trait PollerTuning {
    /// Error reported by the engine
    type Error;

    /// Set the number of pollers
    ///
    /// # Errors
    ///
    /// Engine-defined, e.g. a non-positive count
    fn set_num_loops(&self, num_loops: i32) -> Result<(), Self::Error>;

    /// Set the load-balancing strategy across pollers
    ///
    /// # Errors
    ///
    /// Engine-defined
    fn set_load_balance(&self, load_balance: LoadBalance) -> Result<(), Self::Error>;

    /// Run request handlers without the dispatch pool
    ///
    /// # Errors
    ///
    /// Engine-defined
    fn disable_dispatch_pool(&self) -> Result<(), Self::Error>;
}

impl<T: PollerTuning + ?Sized> PollerTuning for Arc<T> {
    type Error = T::Error;

    fn set_num_loops(&self, num_loops: i32) -> Result<(), Self::Error> {
        (**self).set_num_loops(num_loops)
    }

    fn set_load_balance(&self, load_balance: LoadBalance) -> Result<(), Self::Error> {
        (**self).set_load_balance(load_balance)
    }

    fn disable_dispatch_pool(&self) -> Result<(), Self::Error> {
        (**self).disable_dispatch_pool()
    }
}

/// Handle to the engine's process-wide poller settings
#[derive(Debug, Clone)]
pub struct Tuning<E> {
    engine: E,
}

impl<E: PollerTuning> Tuning<E> {
    /// Wrap an engine
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Set the number of pollers.
    ///
    /// Generally does not need to be set; engines size the pool from the
    /// number of cores. Experience suggests one poller per 20 cores.
    ///
    /// # Errors
    ///
    /// Returns the engine's error unchanged
    pub fn set_num_loops(&self, num_loops: i32) -> Result<(), E::Error> {
        trace!("Forwarding set_num_loops({})", num_loops);
        self.engine.set_num_loops(num_loops)
    }

    /// Set the load-balancing strategy. Only meaningful with more than one
    /// poller.
    ///
    /// # Errors
    ///
    /// Returns the engine's error unchanged
    pub fn set_load_balance(&self, load_balance: LoadBalance) -> Result<(), E::Error> {
        trace!("Forwarding set_load_balance({})", load_balance);
        self.engine.set_load_balance(load_balance)
    }

    /// Disable the dispatch pool so each request runs on a freshly spawned
    /// task instead of a reused one.
    ///
    /// # Errors
    ///
    /// Returns the engine's error unchanged
    pub fn disable_dispatch_pool(&self) -> Result<(), E::Error> {
        trace!("Forwarding disable_dispatch_pool()");
        self.engine.disable_dispatch_pool()
    }

    /// The wrapped engine
    pub fn engine(&self) -> &E {
        &self.engine
    }
}
