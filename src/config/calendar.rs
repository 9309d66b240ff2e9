//! Holiday calendar configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Holiday calendar configuration (Hebcal API)
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl CalendarConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate calendar configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidCalendarUrl);
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.hebcal.com".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_hebcal() {
        let config = CalendarConfig::default();
        assert_eq!(config.base_url, "https://www.hebcal.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_rejects_non_http_url() {
        let config = CalendarConfig {
            base_url: "ftp://calendar.example".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_zero_timeout() {
        let config = CalendarConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
