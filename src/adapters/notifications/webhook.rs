//! Webhook adapter for the completion notifier port.
//!
//! POSTs the cycle summary as JSON to a configured webhook URL (an
//! internal ops channel or automation endpoint). Fire-and-forget from
//! the caller's perspective: outcomes are logged, not acted on.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{CompletionNotifier, CycleSummary};

/// Configuration for the webhook notifier.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Endpoint receiving cycle-completed summaries.
    pub webhook_url: String,

    /// Request timeout.
    pub request_timeout: Duration,
}

/// Completion notifier backed by an HTTP webhook.
pub struct WebhookCompletionNotifier {
    config: NotificationConfig,
    client: reqwest::Client,
}

impl WebhookCompletionNotifier {
    /// Creates an adapter with the given configuration.
    pub fn new(config: NotificationConfig) -> Result<Self, DomainError> {
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
}

#[async_trait]
impl CompletionNotifier for WebhookCompletionNotifier {
    async fn cycle_completed(&self, summary: CycleSummary) -> Result<(), DomainError> {
        debug!(cycle_id = %summary.cycle_id, "dispatching completion summary");

        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(&summary)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Notification endpoint unreachable: {}", e),
                )
            })?;

        if !response.status().is_success() {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Notification endpoint returned {}", response.status()),
            ));
        }

        Ok(())
    }
}
