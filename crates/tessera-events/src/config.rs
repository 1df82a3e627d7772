//! Handler configuration, loadable from RON.
//!
//! ```ron
//! (
//!     strict_configuration: false,
//!     channel_capacity: 128,
//!     log_dropped_events: true,
//! )
//! ```
//!
//! Missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default broadcast capacity for update subscribers.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Panic when `handle` runs before `configure`. Off means warn and skip.
    pub strict_configuration: bool,
    /// Buffered updates per subscriber before lagging receivers drop old ones.
    pub channel_capacity: usize,
    /// Log unknown or inapplicable events at debug level.
    pub log_dropped_events: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            strict_configuration: cfg!(debug_assertions),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            log_dropped_events: true,
        }
    }
}

impl HandlerConfig {
    /// Parse from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: HandlerConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Lenient config for release-style behavior regardless of build profile.
    pub fn lenient() -> Self {
        Self {
            strict_configuration: false,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // tokio's broadcast channel panics on zero capacity
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "channel_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
