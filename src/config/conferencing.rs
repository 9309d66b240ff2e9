//! Conferencing provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Conferencing provider configuration (resource cleanup API)
#[derive(Debug, Clone, Deserialize)]
pub struct ConferencingConfig {
    /// Provider API base URL
    pub base_url: String,

    /// Bearer token for the provider API
    pub api_token: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ConferencingConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate conferencing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("CONFERENCING_BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidConferencingUrl);
        }
        if self.api_token.is_empty() {
            return Err(ValidationError::MissingRequired("CONFERENCING_API_TOKEN"));
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    10
}
