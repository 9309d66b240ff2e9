//! Completion notification configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Completion notification configuration (webhook endpoint)
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Endpoint receiving cycle-completed summaries
    pub webhook_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl NotificationConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate notification configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.webhook_url.is_empty() {
            return Err(ValidationError::MissingRequired("NOTIFICATIONS_WEBHOOK_URL"));
        }
        if !self.webhook_url.starts_with("http://") && !self.webhook_url.starts_with("https://") {
            return Err(ValidationError::InvalidWebhookUrl);
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_accepts_https_webhook() {
        let config = NotificationConfig {
            webhook_url: "https://hooks.internal.example/cycles".to_string(),
            request_timeout_secs: 10,
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn validation_requires_webhook_url() {
        let config = NotificationConfig {
            webhook_url: String::new(),
            request_timeout_secs: 10,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_non_http_url() {
        let config = NotificationConfig {
            webhook_url: "slack://channel".to_string(),
            request_timeout_secs: 10,
        };
        assert!(config.validate().is_err());
    }
}
