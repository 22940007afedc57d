//! Poller settings with an init-once mutation window

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

use tracing::{debug, info};

use crate::tuning::{LoadBalance, PollerTuning};
use crate::{PollconfError, Result};

use super::default_num_loops;

const LB_RANDOM: u8 = 0;
const LB_ROUND_ROBIN: u8 = 1;

/// Process-wide poller settings
///
/// Settings may change until [`PollerState::start`] is called; afterwards
/// every tuning call fails with [`PollconfError::TuningClosed`].
#[derive(Debug)]
pub struct PollerState {
    num_loops: AtomicUsize,
    load_balance: AtomicU8,
    dispatch_pool: AtomicBool,
    started: AtomicBool,
}

impl PollerState {
    /// Create poller settings sized for `cores` cores
    #[must_use]
    pub fn new(cores: usize) -> Self {
        Self {
            num_loops: AtomicUsize::new(default_num_loops(cores)),
            load_balance: AtomicU8::new(encode(LoadBalance::default())),
            dispatch_pool: AtomicBool::new(true),
            started: AtomicBool::new(false),
        }
    }

    /// Close the tuning window
    pub fn start(&self) {
        if !self.started.swap(true, Ordering::AcqRel) {
            info!(
                "Pollers started: num_loops={}, load_balance={}, dispatch_pool={}",
                self.num_loops(),
                self.load_balance(),
                self.dispatch_pool_enabled()
            );
        }
    }

    /// Whether the tuning window is closed
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Current number of pollers
    #[must_use]
    pub fn num_loops(&self) -> usize {
        self.num_loops.load(Ordering::Acquire)
    }

    /// Current load-balancing strategy
    #[must_use]
    pub fn load_balance(&self) -> LoadBalance {
        decode(self.load_balance.load(Ordering::Acquire))
    }

    /// Whether requests are dispatched through the pool
    #[must_use]
    pub fn dispatch_pool_enabled(&self) -> bool {
        self.dispatch_pool.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_started() {
            return Err(PollconfError::TuningClosed);
        }
        Ok(())
    }
}

impl Default for PollerState {
    fn default() -> Self {
        let cores = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
        Self::new(cores)
    }
}

impl PollerTuning for PollerState {
    type Error = PollconfError;

    fn set_num_loops(&self, num_loops: i32) -> Result<()> {
        self.ensure_open()?;

        let count = usize::try_from(num_loops)
            .ok()
            .filter(|&n| n > 0)
            .ok_or(PollconfError::InvalidLoopCount(num_loops))?;

        self.num_loops.store(count, Ordering::Release);
        debug!("Set num_loops to {}", count);
        Ok(())
    }

    fn set_load_balance(&self, load_balance: LoadBalance) -> Result<()> {
        self.ensure_open()?;

        self.load_balance
            .store(encode(load_balance), Ordering::Release);
        debug!("Set load_balance to {}", load_balance);
        Ok(())
    }

    fn disable_dispatch_pool(&self) -> Result<()> {
        self.ensure_open()?;

        self.dispatch_pool.store(false, Ordering::Release);
        debug!("Disabled dispatch pool");
        Ok(())
    }
}

fn encode(load_balance: LoadBalance) -> u8 {
    match load_balance {
        LoadBalance::Random => LB_RANDOM,
        LoadBalance::RoundRobin => LB_ROUND_ROBIN,
    }
}

fn decode(value: u8) -> LoadBalance {
    match value {
        LB_RANDOM => LoadBalance::Random,
        _ => LoadBalance::RoundRobin,
    }
}
