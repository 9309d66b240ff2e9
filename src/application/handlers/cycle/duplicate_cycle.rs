//! DuplicateCycleHandler - Command handler for re-running a cycle at a
//! new start date.
//!
//! The copy anchors to the cycle's weekday, projects an estimated end
//! date, and resets progress. Callers can opt into copying the source's
//! enrolled registrations (same transaction as the new cycle) and into
//! generating the copy's meetings immediately.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{
    domain_event, CommandMetadata, CycleId, DomainError, EventId, SerializableDomainEvent,
    Timestamp,
};
use crate::domain::registration::Registration;
use crate::ports::{
    CycleRepository, DuplicationUnitOfWork, EventPublisher, MeetingRepository,
    RegistrationRepository,
};

use super::super::scheduling::{GenerateMeetingsCommand, GenerateMeetingsHandler};

/// Options controlling what a duplication carries over.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateOptions {
    /// Copy the source cycle's enrolled registrations onto the copy.
    pub copy_registrations: bool,
    /// Immediately generate the copy's meetings.
    pub generate_meetings: bool,
}

/// Command to duplicate a cycle.
#[derive(Debug, Clone)]
pub struct DuplicateCycleCommand {
    /// The cycle to copy.
    pub cycle_id: CycleId,
    /// Start date of the new run; anchored forward to the cycle weekday.
    pub new_start_date: NaiveDate,
    /// What to carry over.
    pub options: DuplicateOptions,
}

/// Result of duplicating a cycle.
#[derive(Debug, Clone)]
pub struct DuplicateCycleResult {
    /// The freshly created cycle.
    pub cycle: Cycle,
    /// Registrations copied onto the new cycle.
    pub copied_registrations: u32,
    /// Meetings generated for the new cycle (0 unless requested).
    pub generated_meetings: u32,
    /// True when the requested generation was truncated.
    pub generation_truncated: bool,
}

/// Event published when a cycle is duplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleDuplicatedEvent {
    pub event_id: EventId,
    pub cycle_id: CycleId,
    pub source_cycle_id: CycleId,
    pub copied_registrations: u32,
    pub duplicated_at: Timestamp,
}

domain_event!(
    CycleDuplicatedEvent,
    event_type = "cycle.duplicated.v1",
    schema_version = 1,
    aggregate_id = cycle_id,
    aggregate_type = "Cycle",
    occurred_at = duplicated_at,
    event_id = event_id
);

/// Error type for duplicating a cycle.
#[derive(Debug, Clone)]
pub enum DuplicateCycleError {
    /// Source cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (storage, generation).
    Domain(DomainError),
}

impl std::fmt::Display for DuplicateCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicateCycleError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            DuplicateCycleError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DuplicateCycleError {}

impl From<DomainError> for DuplicateCycleError {
    fn from(err: DomainError) -> Self {
        DuplicateCycleError::Domain(err)
    }
}

/// Handler for duplicating cycles.
pub struct DuplicateCycleHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    meeting_repository: Arc<dyn MeetingRepository>,
    registration_repository: Arc<dyn RegistrationRepository>,
    unit_of_work: Arc<dyn DuplicationUnitOfWork>,
    meeting_generation: Arc<GenerateMeetingsHandler>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl DuplicateCycleHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        meeting_repository: Arc<dyn MeetingRepository>,
        registration_repository: Arc<dyn RegistrationRepository>,
        unit_of_work: Arc<dyn DuplicationUnitOfWork>,
        meeting_generation: Arc<GenerateMeetingsHandler>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            cycle_repository,
            meeting_repository,
            registration_repository,
            unit_of_work,
            meeting_generation,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: DuplicateCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<DuplicateCycleResult, DuplicateCycleError> {
        // 1. Load the source and derive the copy
        let source = self
            .cycle_repository
            .find_by_id(&cmd.cycle_id)
            .await?
            .ok_or(DuplicateCycleError::CycleNotFound(cmd.cycle_id))?;
        let mut copy = source.duplicate(cmd.new_start_date);
        copy.take_events();

        // 2. Copy enrolled registrations when requested
        let copied: Vec<Registration> = if cmd.options.copy_registrations {
            self.registration_repository
                .find_enrolled_by_cycle_id(&source.id())
                .await?
                .iter()
                .map(|r| r.copy_to_cycle(copy.id()))
                .collect()
        } else {
            Vec::new()
        };

        // 3. New cycle and copied registrations commit together
        self.unit_of_work
            .commit_duplication(&copy, &copied)
            .await?;

        info!(
            source_cycle_id = %source.id(),
            cycle_id = %copy.id(),
            start_date = %copy.start_date(),
            copied_registrations = copied.len(),
            "cycle duplicated"
        );

        // 4. Optionally generate the copy's meetings right away
        let mut generated_meetings = 0;
        let mut generation_truncated = false;
        if cmd.options.generate_meetings {
            let generation = self
                .meeting_generation
                .handle(
                    GenerateMeetingsCommand {
                        cycle_id: copy.id(),
                        count: Some(copy.total_meetings()),
                    },
                    metadata.clone(),
                )
                .await
                .map_err(generation_error_to_domain)?;
            generated_meetings = generation.generated_dates.len() as u32;
            generation_truncated = generation.truncated;

            // Generation grows the pending balance on top of the reset
            // counters; re-run the authoritative reconciliation so the
            // copy leaves this handler consistent.
            copy = self.reconcile_copy(copy.id()).await?;
        }

        // 5. Publish event
        let event = CycleDuplicatedEvent {
            event_id: EventId::new(),
            cycle_id: copy.id(),
            source_cycle_id: source.id(),
            copied_registrations: copied.len() as u32,
            duplicated_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(DuplicateCycleResult {
            cycle: copy,
            copied_registrations: copied.len() as u32,
            generated_meetings,
            generation_truncated,
        })
    }

    async fn reconcile_copy(&self, cycle_id: CycleId) -> Result<Cycle, DomainError> {
        let mut copy = self
            .cycle_repository
            .find_by_id(&cycle_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    crate::domain::foundation::ErrorCode::CycleNotFound,
                    format!("Cycle not found: {}", cycle_id),
                )
            })?;
        let completed = self
            .meeting_repository
            .count_completed_by_cycle_id(&cycle_id)
            .await?;
        let total = self.meeting_repository.count_by_cycle_id(&cycle_id).await?;
        copy.apply_progress(completed, total)?;
        self.cycle_repository.update(&copy).await?;
        Ok(copy)
    }
}

fn generation_error_to_domain(err: super::super::scheduling::GenerateMeetingsError) -> DomainError {
    use super::super::scheduling::GenerateMeetingsError;
    match err {
        GenerateMeetingsError::CycleNotFound(id) => DomainError::new(
            crate::domain::foundation::ErrorCode::CycleNotFound,
            format!("Cycle not found: {}", id),
        ),
        GenerateMeetingsError::Domain(err) => err,
    }
}
