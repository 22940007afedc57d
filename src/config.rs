//! File-based configuration for pollconf

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::options::{with_idle_timeout, with_read_timeout, LoopOption};
use crate::tuning::{LoadBalance, PollerTuning, Tuning};
use crate::{PollconfError, Result};

/// Event loop configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Read timeout in milliseconds
    #[serde(default)]
    pub read_timeout_ms: Option<u64>,
    /// Idle timeout in milliseconds
    #[serde(default)]
    pub idle_timeout_ms: Option<u64>,
    /// Poller tuning
    #[serde(default)]
    pub tuning: TuningConfig,
}

/// Poller tuning section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuningConfig {
    /// Number of pollers
    #[serde(default)]
    pub num_loops: Option<i32>,
    /// Load-balancing strategy
    #[serde(default)]
    pub load_balance: Option<LoadBalance>,
    /// Run requests without the dispatch pool
    #[serde(default)]
    pub disable_dispatch_pool: bool,
}

impl LoopConfig {
    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PollconfError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| PollconfError::ConfigError(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<()> {
        if let Some(num_loops) = self.tuning.num_loops {
            if num_loops <= 0 {
                return Err(PollconfError::ConfigError(format!(
                    "tuning.num_loops must be > 0, got {num_loops}"
                )));
            }
        }

        Ok(())
    }

    /// Options for the timeouts present in the file
    ///
    /// Options appended after these override them.
    #[must_use]
    pub fn options(&self) -> Vec<LoopOption> {
        let mut options = Vec::with_capacity(2);

        if let Some(ms) = self.read_timeout_ms {
            options.push(with_read_timeout(Duration::from_millis(ms)));
        }
        if let Some(ms) = self.idle_timeout_ms {
            options.push(with_idle_timeout(Duration::from_millis(ms)));
        }

        options
    }

    /// Forward the tuning section through `tuning`
    ///
    /// # Errors
    ///
    /// Returns the first engine failure
    pub fn apply_tuning<E>(&self, tuning: &Tuning<E>) -> Result<()>
    where
        E: PollerTuning,
        E::Error: fmt::Display,
    {
        let failed = |e: E::Error| PollconfError::Tuning(e.to_string());

        if let Some(num_loops) = self.tuning.num_loops {
            tuning.set_num_loops(num_loops).map_err(failed)?;
        }
        if let Some(load_balance) = self.tuning.load_balance {
            tuning.set_load_balance(load_balance).map_err(failed)?;
        }
        if self.tuning.disable_dispatch_pool {
            tuning.disable_dispatch_pool().map_err(failed)?;
        }

        Ok(())
    }
}
