//! Recording completion notifier for testing.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{CompletionNotifier, CycleSummary};

/// Completion notifier that records dispatched summaries.
///
/// For tests only; supports error injection to verify that notification
/// failure never unwinds the cascade.
#[derive(Default)]
pub struct RecordingCompletionNotifier {
    summaries: Mutex<Vec<CycleSummary>>,
    fail: Mutex<bool>,
}

impl RecordingCompletionNotifier {
    /// Creates a notifier recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent dispatch fail.
    pub fn fail_dispatch(&self) {
        *self.fail.lock().expect("lock poisoned") = true;
    }

    /// Returns the dispatched summaries.
    pub fn summaries(&self) -> Vec<CycleSummary> {
        self.summaries.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl CompletionNotifier for RecordingCompletionNotifier {
    async fn cycle_completed(&self, summary: CycleSummary) -> Result<(), DomainError> {
        if *self.fail.lock().expect("lock poisoned") {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Simulated notification outage",
            ));
        }
        self.summaries.lock().expect("lock poisoned").push(summary);
        Ok(())
    }
}
