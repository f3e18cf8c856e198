//! Application configuration module
//!
//! Configuration is read from environment variables with the `CARE_TRIAGE`
//! prefix; nested values use double underscores as separators. Every section
//! has defaults, so an empty environment yields a working engine.
//!
//! # Example
//!
//! ```no_run
//! use care_triage::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let engine = config.triage.build_engine().expect("Failed to build engine");
//! ```

mod error;
mod guidance;
mod telemetry;
mod triage;

pub use error::{ConfigError, ValidationError};
pub use guidance::GuidanceConfig;
pub use telemetry::TelemetryConfig;
pub use triage::TriageConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Thresholds, question policy and table locations
    #[serde(default)]
    pub triage: TriageConfig,

    /// Guidance synthesizer timeout
    #[serde(default)]
    pub guidance: GuidanceConfig,

    /// Log filter and output format
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `CARE_TRIAGE__SECTION__KEY`
    /// variables.
    ///
    /// - `CARE_TRIAGE__TRIAGE__MAX_QUESTIONS=3` -> `triage.max_questions = 3`
    /// - `CARE_TRIAGE__GUIDANCE__TIMEOUT_MS=5000` -> `guidance.timeout_ms = 5000`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed into its field type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CARE_TRIAGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.triage.validate()?;
        self.guidance.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}
