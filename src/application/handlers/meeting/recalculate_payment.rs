//! RecalculatePaymentHandler - Command handler for re-deriving a
//! meeting's financials from current rates.
//!
//! Valid in any meeting state and never changes status; used when rate
//! tables or budget envelopes change after meetings were priced.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::foundation::{
    domain_event, CommandMetadata, CycleId, DomainError, EventId, MeetingId,
    SerializableDomainEvent, Timestamp,
};
use crate::domain::meeting::Meeting;
use crate::ports::{CycleRepository, EventPublisher, InstructorDirectory, MeetingRepository};

use super::payment_support::resolve_payment;

/// Command to recalculate a meeting's payment.
#[derive(Debug, Clone)]
pub struct RecalculatePaymentCommand {
    /// The meeting to reprice.
    pub meeting_id: MeetingId,
}

/// Result of a payment recalculation.
#[derive(Debug, Clone)]
pub struct RecalculatePaymentResult {
    /// The meeting with refreshed financials.
    pub meeting: Meeting,
    /// The freshly computed instructor payment.
    pub instructor_payment: i64,
}

/// Event published when a meeting's payment is recalculated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingPaymentRecalculatedEvent {
    pub event_id: EventId,
    pub meeting_id: MeetingId,
    pub cycle_id: CycleId,
    pub instructor_payment: i64,
    pub recalculated_at: Timestamp,
}

domain_event!(
    MeetingPaymentRecalculatedEvent,
    event_type = "meeting.payment_recalculated.v1",
    schema_version = 1,
    aggregate_id = meeting_id,
    aggregate_type = "Meeting",
    occurred_at = recalculated_at,
    event_id = event_id
);

/// Error type for payment recalculation.
#[derive(Debug, Clone)]
pub enum RecalculatePaymentError {
    /// Meeting not found.
    MeetingNotFound(MeetingId),
    /// Owning cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (unknown instructor, storage).
    Domain(DomainError),
}

impl std::fmt::Display for RecalculatePaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecalculatePaymentError::MeetingNotFound(id) => {
                write!(f, "Meeting not found: {}", id)
            }
            RecalculatePaymentError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            RecalculatePaymentError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RecalculatePaymentError {}

impl From<DomainError> for RecalculatePaymentError {
    fn from(err: DomainError) -> Self {
        RecalculatePaymentError::Domain(err)
    }
}

/// Handler for recalculating meeting payments.
pub struct RecalculatePaymentHandler {
    meeting_repository: Arc<dyn MeetingRepository>,
    cycle_repository: Arc<dyn CycleRepository>,
    instructor_directory: Arc<dyn InstructorDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RecalculatePaymentHandler {
    pub fn new(
        meeting_repository: Arc<dyn MeetingRepository>,
        cycle_repository: Arc<dyn CycleRepository>,
        instructor_directory: Arc<dyn InstructorDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            meeting_repository,
            cycle_repository,
            instructor_directory,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecalculatePaymentCommand,
        metadata: CommandMetadata,
    ) -> Result<RecalculatePaymentResult, RecalculatePaymentError> {
        // 1. Load meeting and its owning cycle
        let mut meeting = self
            .meeting_repository
            .find_by_id(&cmd.meeting_id)
            .await?
            .ok_or(RecalculatePaymentError::MeetingNotFound(cmd.meeting_id))?;
        let cycle = self
            .cycle_repository
            .find_by_id(&meeting.cycle_id())
            .await?
            .ok_or(RecalculatePaymentError::CycleNotFound(meeting.cycle_id()))?;

        // 2. Reprice against current rates; status is untouched
        let payment = resolve_payment(&cycle, &meeting, &self.instructor_directory).await?;
        meeting.recalculate_payment(payment);
        self.meeting_repository.update(&meeting).await?;

        info!(
            meeting_id = %meeting.id(),
            payment,
            "meeting payment recalculated"
        );

        // 3. Publish event
        let event = MeetingPaymentRecalculatedEvent {
            event_id: EventId::new(),
            meeting_id: meeting.id(),
            cycle_id: meeting.cycle_id(),
            instructor_payment: payment,
            recalculated_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(RecalculatePaymentResult {
            meeting,
            instructor_payment: payment,
        })
    }
}
