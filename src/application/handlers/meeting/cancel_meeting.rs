//! CancelMeetingHandler - Command handler for calling off a meeting.
//!
//! A cancelled meeting is neither completed nor pending: the cycle's
//! remaining balance shrinks without growing the completed count, and no
//! completion cascade fires even when the balance reaches zero.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{
    domain_event, CommandMetadata, CycleId, DomainError, EventId, MeetingId,
    SerializableDomainEvent, Timestamp,
};
use crate::domain::meeting::Meeting;
use crate::ports::{CycleRepository, EventPublisher, MeetingRepository};

/// Command to cancel a meeting.
#[derive(Debug, Clone)]
pub struct CancelMeetingCommand {
    /// The meeting to cancel.
    pub meeting_id: MeetingId,
    /// Why the meeting will not take place.
    pub reason: String,
}

/// Result of cancelling a meeting.
#[derive(Debug, Clone)]
pub struct CancelMeetingResult {
    /// The cancelled meeting.
    pub meeting: Meeting,
    /// The owning cycle after the counter update.
    pub cycle: Cycle,
}

/// Event published when a meeting is cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingCancelledEvent {
    pub event_id: EventId,
    pub meeting_id: MeetingId,
    pub cycle_id: CycleId,
    pub reason: String,
    pub cancelled_at: Timestamp,
}

domain_event!(
    MeetingCancelledEvent,
    event_type = "meeting.cancelled.v1",
    schema_version = 1,
    aggregate_id = meeting_id,
    aggregate_type = "Meeting",
    occurred_at = cancelled_at,
    event_id = event_id
);

/// Error type for cancelling a meeting.
#[derive(Debug, Clone)]
pub enum CancelMeetingError {
    /// Meeting not found.
    MeetingNotFound(MeetingId),
    /// Owning cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (invalid transition, storage).
    Domain(DomainError),
}

impl std::fmt::Display for CancelMeetingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelMeetingError::MeetingNotFound(id) => write!(f, "Meeting not found: {}", id),
            CancelMeetingError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            CancelMeetingError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CancelMeetingError {}

impl From<DomainError> for CancelMeetingError {
    fn from(err: DomainError) -> Self {
        CancelMeetingError::Domain(err)
    }
}

/// Handler for cancelling meetings.
pub struct CancelMeetingHandler {
    meeting_repository: Arc<dyn MeetingRepository>,
    cycle_repository: Arc<dyn CycleRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CancelMeetingHandler {
    pub fn new(
        meeting_repository: Arc<dyn MeetingRepository>,
        cycle_repository: Arc<dyn CycleRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            meeting_repository,
            cycle_repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelMeetingCommand,
        metadata: CommandMetadata,
    ) -> Result<CancelMeetingResult, CancelMeetingError> {
        // 1. Load meeting and its owning cycle
        let mut meeting = self
            .meeting_repository
            .find_by_id(&cmd.meeting_id)
            .await?
            .ok_or(CancelMeetingError::MeetingNotFound(cmd.meeting_id))?;
        let mut cycle = self
            .cycle_repository
            .find_by_id(&meeting.cycle_id())
            .await?
            .ok_or(CancelMeetingError::CycleNotFound(meeting.cycle_id()))?;

        // 2. Transition the meeting and shrink the pending balance
        meeting.cancel(cmd.reason.clone())?;
        cycle.meeting_cancelled()?;

        // 3. Persist both records
        self.meeting_repository.update(&meeting).await?;
        self.cycle_repository.update(&cycle).await?;

        info!(
            meeting_id = %meeting.id(),
            cycle_id = %cycle.id(),
            reason = %cmd.reason,
            "meeting cancelled"
        );

        // 4. Publish event
        let event = MeetingCancelledEvent {
            event_id: EventId::new(),
            meeting_id: meeting.id(),
            cycle_id: cycle.id(),
            reason: cmd.reason,
            cancelled_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(CancelMeetingResult { meeting, cycle })
    }
}
