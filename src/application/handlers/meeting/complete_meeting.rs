//! CompleteMeetingHandler - Command handler for marking a meeting as held.
//!
//! Completion finalizes the meeting's financials, moves the owning
//! cycle's counters, and - when the last pending meeting completes -
//! triggers the cycle completion cascade exactly once.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{
    domain_event, CommandMetadata, CycleId, DomainError, EventId, MeetingId,
    SerializableDomainEvent, Timestamp,
};
use crate::domain::meeting::Meeting;
use crate::ports::{CycleRepository, EventPublisher, InstructorDirectory, MeetingRepository};

use super::super::cycle::{CompleteCycleCommand, CompleteCycleHandler};
use super::payment_support::resolve_payment;

/// Command to complete a meeting.
#[derive(Debug, Clone)]
pub struct CompleteMeetingCommand {
    /// The meeting that was held.
    pub meeting_id: MeetingId,
}

/// Result of completing a meeting.
#[derive(Debug, Clone)]
pub struct CompleteMeetingResult {
    /// The completed meeting with final financials.
    pub meeting: Meeting,
    /// The owning cycle after counter updates (and possibly completion).
    pub cycle: Cycle,
    /// True when this completion exhausted the cycle and ran the
    /// completion cascade.
    pub cycle_completed: bool,
}

/// Event published when a meeting completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingCompletedEvent {
    pub event_id: EventId,
    pub meeting_id: MeetingId,
    pub cycle_id: CycleId,
    pub instructor_payment: i64,
    pub completed_at: Timestamp,
}

domain_event!(
    MeetingCompletedEvent,
    event_type = "meeting.completed.v1",
    schema_version = 1,
    aggregate_id = meeting_id,
    aggregate_type = "Meeting",
    occurred_at = completed_at,
    event_id = event_id
);

/// Error type for completing a meeting.
#[derive(Debug, Clone)]
pub enum CompleteMeetingError {
    /// Meeting not found.
    MeetingNotFound(MeetingId),
    /// Owning cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (invalid transition, unknown instructor, storage).
    Domain(DomainError),
    /// The completion cascade triggered by this meeting failed.
    CompletionCascade(String),
}

impl std::fmt::Display for CompleteMeetingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompleteMeetingError::MeetingNotFound(id) => write!(f, "Meeting not found: {}", id),
            CompleteMeetingError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            CompleteMeetingError::Domain(err) => write!(f, "{}", err),
            CompleteMeetingError::CompletionCascade(msg) => {
                write!(f, "Completion cascade failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for CompleteMeetingError {}

impl From<DomainError> for CompleteMeetingError {
    fn from(err: DomainError) -> Self {
        CompleteMeetingError::Domain(err)
    }
}

/// Handler for completing meetings.
pub struct CompleteMeetingHandler {
    meeting_repository: Arc<dyn MeetingRepository>,
    cycle_repository: Arc<dyn CycleRepository>,
    instructor_directory: Arc<dyn InstructorDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
    cycle_completion: Arc<CompleteCycleHandler>,
}

impl CompleteMeetingHandler {
    pub fn new(
        meeting_repository: Arc<dyn MeetingRepository>,
        cycle_repository: Arc<dyn CycleRepository>,
        instructor_directory: Arc<dyn InstructorDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
        cycle_completion: Arc<CompleteCycleHandler>,
    ) -> Self {
        Self {
            meeting_repository,
            cycle_repository,
            instructor_directory,
            event_publisher,
            cycle_completion,
        }
    }

    pub async fn handle(
        &self,
        cmd: CompleteMeetingCommand,
        metadata: CommandMetadata,
    ) -> Result<CompleteMeetingResult, CompleteMeetingError> {
        // 1. Load meeting and its owning cycle
        let mut meeting = self
            .meeting_repository
            .find_by_id(&cmd.meeting_id)
            .await?
            .ok_or(CompleteMeetingError::MeetingNotFound(cmd.meeting_id))?;
        let mut cycle = self
            .cycle_repository
            .find_by_id(&meeting.cycle_id())
            .await?
            .ok_or(CompleteMeetingError::CycleNotFound(meeting.cycle_id()))?;

        // 2. Finalize financials and transition the meeting
        let payment = resolve_payment(&cycle, &meeting, &self.instructor_directory).await?;
        meeting.complete(metadata.user_id.clone(), payment)?;

        // 3. Move the cycle's counters
        cycle.meeting_completed()?;

        // 4. Persist both records
        self.meeting_repository.update(&meeting).await?;
        self.cycle_repository.update(&cycle).await?;

        info!(
            meeting_id = %meeting.id(),
            cycle_id = %cycle.id(),
            payment = meeting.instructor_payment().unwrap_or(0),
            remaining = cycle.remaining_meetings(),
            "meeting completed"
        );

        // 5. Publish event
        let event = MeetingCompletedEvent {
            event_id: EventId::new(),
            meeting_id: meeting.id(),
            cycle_id: cycle.id(),
            instructor_payment: meeting.instructor_payment().unwrap_or(0),
            completed_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());
        self.event_publisher.publish(envelope).await?;

        // 6. Last pending meeting completed: run the completion cascade
        let mut cycle_completed = false;
        if cycle.is_exhausted() {
            let cascade = self
                .cycle_completion
                .handle(
                    CompleteCycleCommand {
                        cycle_id: cycle.id(),
                    },
                    metadata,
                )
                .await
                .map_err(|e| CompleteMeetingError::CompletionCascade(e.to_string()))?;
            cycle = cascade.cycle;
            cycle_completed = true;
        }

        Ok(CompleteMeetingResult {
            meeting,
            cycle,
            cycle_completed,
        })
    }
}
