//! Completion notifier port - human-facing summary of a finished cycle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CycleId, DomainError};

/// Financial and attendance aggregates of a completed cycle.
///
/// Computed from the final meeting set once the cascade's durable writes
/// have committed; delivered for human review, not consumed by this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub cycle_id: CycleId,
    pub course_name: String,
    pub total_meetings: u32,
    pub completed_meetings: u32,
    pub cancelled_meetings: u32,
    pub total_revenue: i64,
    pub total_instructor_payment: i64,
    pub total_profit: i64,
    pub completed_registrations: u32,
    pub upsell_leads_created: u32,
}

/// Fire-and-forget notification of cycle completion.
///
/// Dispatch outcomes are logged by the caller; a delivery failure never
/// unwinds the completion cascade.
#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    /// Send a cycle-completed summary notification.
    async fn cycle_completed(&self, summary: CycleSummary) -> Result<(), DomainError>;
}
