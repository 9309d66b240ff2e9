//! Recording conference cleanup for testing.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::ConferenceCleanup;

/// Conference cleanup that records deletion requests.
///
/// For tests only; supports error injection to exercise the cascade's
/// log-and-continue behavior.
#[derive(Default)]
pub struct RecordingConferenceCleanup {
    deleted: Mutex<Vec<String>>,
    fail: Mutex<bool>,
}

impl RecordingConferenceCleanup {
    /// Creates a cleanup recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent deletion request fail.
    pub fn fail_deletions(&self) {
        *self.fail.lock().expect("lock poisoned") = true;
    }

    /// Returns the resource IDs whose deletion was requested.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl ConferenceCleanup for RecordingConferenceCleanup {
    async fn delete_meeting_resource(&self, resource_id: &str) -> Result<(), DomainError> {
        if *self.fail.lock().expect("lock poisoned") {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Simulated conferencing outage",
            ));
        }
        self.deleted
            .lock()
            .expect("lock poisoned")
            .push(resource_id.to_string());
        Ok(())
    }
}
