//! PostponeMeetingHandler - Command handler for pushing a meeting to a
//! new date.
//!
//! Postponement exchanges one scheduled meeting for another: the original
//! becomes terminal (`Postponed`) and a successor takes its place on the
//! new date, so the cycle's counters do not move. The two records link to
//! each other and are persisted in one transaction.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::foundation::{
    domain_event, CommandMetadata, CycleId, DomainError, EventId, MeetingId,
    SerializableDomainEvent, Timestamp,
};
use crate::domain::meeting::Meeting;
use crate::ports::{EventPublisher, MeetingRepository};

/// Command to postpone a meeting.
#[derive(Debug, Clone)]
pub struct PostponeMeetingCommand {
    /// The meeting to push out.
    pub meeting_id: MeetingId,
    /// The replacement date.
    pub new_date: NaiveDate,
    /// Replacement start time; defaults to the original's.
    pub new_start_time: Option<NaiveTime>,
    /// Replacement end time; defaults to the original's.
    pub new_end_time: Option<NaiveTime>,
}

/// Result of postponing a meeting.
#[derive(Debug, Clone)]
pub struct PostponeMeetingResult {
    /// The original meeting, now terminal and linked forward.
    pub original: Meeting,
    /// The freshly scheduled successor, linked backward.
    pub successor: Meeting,
}

/// Event published when a meeting is postponed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingPostponedEvent {
    pub event_id: EventId,
    pub meeting_id: MeetingId,
    pub successor_id: MeetingId,
    pub cycle_id: CycleId,
    pub new_date: NaiveDate,
    pub postponed_at: Timestamp,
}

domain_event!(
    MeetingPostponedEvent,
    event_type = "meeting.postponed.v1",
    schema_version = 1,
    aggregate_id = meeting_id,
    aggregate_type = "Meeting",
    occurred_at = postponed_at,
    event_id = event_id
);

/// Error type for postponing a meeting.
#[derive(Debug, Clone)]
pub enum PostponeMeetingError {
    /// Meeting not found.
    MeetingNotFound(MeetingId),
    /// Domain error (invalid transition, storage).
    Domain(DomainError),
}

impl std::fmt::Display for PostponeMeetingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostponeMeetingError::MeetingNotFound(id) => write!(f, "Meeting not found: {}", id),
            PostponeMeetingError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PostponeMeetingError {}

impl From<DomainError> for PostponeMeetingError {
    fn from(err: DomainError) -> Self {
        PostponeMeetingError::Domain(err)
    }
}

/// Handler for postponing meetings.
pub struct PostponeMeetingHandler {
    meeting_repository: Arc<dyn MeetingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl PostponeMeetingHandler {
    pub fn new(
        meeting_repository: Arc<dyn MeetingRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            meeting_repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: PostponeMeetingCommand,
        metadata: CommandMetadata,
    ) -> Result<PostponeMeetingResult, PostponeMeetingError> {
        // 1. Load the meeting
        let mut original = self
            .meeting_repository
            .find_by_id(&cmd.meeting_id)
            .await?
            .ok_or(PostponeMeetingError::MeetingNotFound(cmd.meeting_id))?;

        // 2. Spawn the linked successor
        let successor = original.postpone(cmd.new_date, cmd.new_start_time, cmd.new_end_time)?;

        // 3. Persist the pair atomically
        self.meeting_repository
            .save_postponement(&original, &successor)
            .await?;

        info!(
            meeting_id = %original.id(),
            successor_id = %successor.id(),
            new_date = %cmd.new_date,
            "meeting postponed"
        );

        // 4. Publish event
        let event = MeetingPostponedEvent {
            event_id: EventId::new(),
            meeting_id: original.id(),
            successor_id: successor.id(),
            cycle_id: original.cycle_id(),
            new_date: cmd.new_date,
            postponed_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(PostponeMeetingResult {
            original,
            successor,
        })
    }
}
