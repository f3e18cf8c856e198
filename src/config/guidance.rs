//! Guidance synthesizer configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound on how long a turn may wait for guidance.
const MAX_TIMEOUT_MS: u64 = 120_000;

/// Guidance synthesizer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GuidanceConfig {
    /// How long to wait for the synthesizer before answering without guidance
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl GuidanceConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_ms == 0 || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}
