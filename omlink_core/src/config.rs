//! Engine configuration.
//!
//! Loaded from TOML through the shared [`ConfigLoader`] blanket impl.
//! Every section and field has a default, so an empty file is valid.
//!
//! ```toml
//! [shared]
//! log_level = "info"
//! service_name = "omlink"
//!
//! [poll]
//! interval_ms = 1000
//! response_quiet_ms = 700
//! timeout_ms = 8000
//! category_retry_ms = 8000
//!
//! [display]
//! heater_combine = "not_combined"
//! ```

use omlink_common::config::{ConfigError, ConfigLoader, SharedConfig};
use omlink_common::consts::{
    DEFAULT_CATEGORY_RETRY_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_POLL_TIMEOUT_MS,
    DEFAULT_RESPONSE_QUIET_MS,
};
use omlink_common::status::HeaterCombineType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Poll loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Minimum interval between two polls [ms].
    pub interval_ms: u32,
    /// Quiet period after a response before the next poll [ms].
    pub response_quiet_ms: u32,
    /// Abandon the request in flight after this long without a response [ms].
    pub timeout_ms: u32,
    /// Retry delay of a category fetch [ms].
    pub category_retry_ms: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            response_quiet_ms: DEFAULT_RESPONSE_QUIET_MS,
            timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
            category_retry_ms: DEFAULT_CATEGORY_RETRY_MS,
        }
    }
}

/// Display layout options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub heater_combine: HeaterCombineType,
}

/// Top-level configuration of an omlink instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub shared: SharedConfig,
    pub poll: PollConfig,
    pub display: DisplayConfig,
}

impl SyncConfig {
    /// Load and validate a configuration file.
    pub fn load_validated(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationError` for a zero interval or timeout, or a
    /// quiet period or interval not shorter than the timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        let poll = &self.poll;
        if poll.interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "poll.interval_ms must be > 0".to_string(),
            ));
        }
        if poll.timeout_ms == 0 || poll.category_retry_ms == 0 {
            return Err(ConfigError::ValidationError(
                "poll.timeout_ms and poll.category_retry_ms must be > 0".to_string(),
            ));
        }
        if poll.interval_ms >= poll.timeout_ms {
            return Err(ConfigError::ValidationError(format!(
                "poll.interval_ms ({}) must be shorter than poll.timeout_ms ({})",
                poll.interval_ms, poll.timeout_ms
            )));
        }
        if poll.response_quiet_ms >= poll.timeout_ms {
            return Err(ConfigError::ValidationError(format!(
                "poll.response_quiet_ms ({}) must be shorter than poll.timeout_ms ({})",
                poll.response_quiet_ms, poll.timeout_ms
            )));
        }
        Ok(())
    }
}
