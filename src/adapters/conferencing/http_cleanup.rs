//! HTTP adapter for the conference cleanup port.
//!
//! Deletes conferencing resources through the provider's REST API
//! (DELETE /meetings/{id} with bearer authentication). Callers treat
//! this adapter as best-effort; errors carry enough context to log.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::ConferenceCleanup;

/// Configuration for the conferencing cleanup adapter.
#[derive(Debug, Clone)]
pub struct ConferencingConfig {
    /// Provider API base URL (e.g., "https://api.zoom.us/v2").
    pub base_url: String,

    /// Bearer token for the provider API.
    pub api_token: String,

    /// Request timeout.
    pub request_timeout: Duration,
}

/// Conference cleanup backed by the provider's REST API.
pub struct HttpConferenceCleanup {
    config: ConferencingConfig,
    client: reqwest::Client,
}

impl HttpConferenceCleanup {
    /// Creates an adapter with the given configuration.
    pub fn new(config: ConferencingConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to build HTTP client: {}", e),
                )
            })?;

        Ok(Self { config, client })
    }

    fn resource_url(&self, resource_id: &str) -> String {
        format!(
            "{}/meetings/{}",
            self.config.base_url.trim_end_matches('/'),
            resource_id
        )
    }
}

#[async_trait]
impl ConferenceCleanup for HttpConferenceCleanup {
    async fn delete_meeting_resource(&self, resource_id: &str) -> Result<(), DomainError> {
        let url = self.resource_url(resource_id);
        debug!(resource_id, %url, "deleting conferencing resource");

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Conferencing provider unreachable: {}", e),
                )
            })?;

        // A resource that is already gone counts as cleaned up.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Conferencing provider returned {}", response.status()),
            ));
        }

        Ok(())
    }
}
