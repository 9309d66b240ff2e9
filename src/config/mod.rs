//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `CLASS_PULSE` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use class_pulse::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod calendar;
mod conferencing;
mod database;
mod error;
mod notifications;

pub use calendar::CalendarConfig;
pub use conferencing::ConferencingConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use notifications::NotificationConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the scheduling core. Load
/// using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Holiday calendar configuration (Hebcal API)
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Conferencing provider configuration (resource cleanup)
    pub conferencing: ConferencingConfig,

    /// Completion notification configuration (webhook)
    pub notifications: NotificationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `CLASS_PULSE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CLASS_PULSE__DATABASE__URL=...` -> `database.url = ...`
    /// - `CLASS_PULSE__CALENDAR__BASE_URL=...` -> `calendar.base_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required environment variables are missing
    /// or values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CLASS_PULSE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of every section: URL formats, pool
    /// size constraints, timeout bounds.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.calendar.validate()?;
        self.conferencing.validate()?;
        self.notifications.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            database: DatabaseConfig {
                url: "postgresql://localhost/classes".to_string(),
                ..Default::default()
            },
            calendar: CalendarConfig::default(),
            conferencing: ConferencingConfig {
                base_url: "https://api.zoom.us/v2".to_string(),
                api_token: "token".to_string(),
                request_timeout_secs: 10,
            },
            notifications: NotificationConfig {
                webhook_url: "https://hooks.internal.example/cycles".to_string(),
                request_timeout_secs: 10,
            },
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn invalid_section_fails_validation() {
        let mut config = valid_config();
        config.database.url = String::new();
        assert!(config.validate().is_err());
    }
}
