//! SyncProgressHandler - Command handler for reconciling a cycle's
//! counters against its actual meeting records.
//!
//! The authoritative repair operation when counters have drifted from
//! reality (manual edits, partial imports, interrupted operations).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::cycle::{Cycle, CycleProgress};
use crate::domain::foundation::{
    domain_event, CommandMetadata, CycleId, DomainError, EventId, SerializableDomainEvent,
    Timestamp,
};
use crate::ports::{CycleRepository, EventPublisher, MeetingRepository};

/// Command to reconcile a cycle's progress counters.
#[derive(Debug, Clone)]
pub struct SyncProgressCommand {
    /// The cycle to reconcile.
    pub cycle_id: CycleId,
}

/// Result of a reconciliation.
#[derive(Debug, Clone)]
pub struct SyncProgressResult {
    /// The cycle with repaired counters.
    pub cycle: Cycle,
    /// The reconciled counter snapshot.
    pub progress: CycleProgress,
}

/// Event published when counters are reconciled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleProgressSyncedEvent {
    pub event_id: EventId,
    pub cycle_id: CycleId,
    pub total_meetings: u32,
    pub completed_meetings: u32,
    pub remaining_meetings: u32,
    pub synced_at: Timestamp,
}

domain_event!(
    CycleProgressSyncedEvent,
    event_type = "cycle.progress_synced.v1",
    schema_version = 1,
    aggregate_id = cycle_id,
    aggregate_type = "Cycle",
    occurred_at = synced_at,
    event_id = event_id
);

/// Error type for progress reconciliation.
#[derive(Debug, Clone)]
pub enum SyncProgressError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (irreparable counters, storage).
    Domain(DomainError),
}

impl std::fmt::Display for SyncProgressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncProgressError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            SyncProgressError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SyncProgressError {}

impl From<DomainError> for SyncProgressError {
    fn from(err: DomainError) -> Self {
        SyncProgressError::Domain(err)
    }
}

/// Handler for progress reconciliation.
pub struct SyncProgressHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    meeting_repository: Arc<dyn MeetingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SyncProgressHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        meeting_repository: Arc<dyn MeetingRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            cycle_repository,
            meeting_repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: SyncProgressCommand,
        metadata: CommandMetadata,
    ) -> Result<SyncProgressResult, SyncProgressError> {
        // 1. Load the cycle
        let mut cycle = self
            .cycle_repository
            .find_by_id(&cmd.cycle_id)
            .await?
            .ok_or(SyncProgressError::CycleNotFound(cmd.cycle_id))?;

        // 2. Count the truth
        let completed_rows = self
            .meeting_repository
            .count_completed_by_cycle_id(&cmd.cycle_id)
            .await?;
        let total_rows = self
            .meeting_repository
            .count_by_cycle_id(&cmd.cycle_id)
            .await?;

        // 3. Repair and persist
        let progress = cycle.apply_progress(completed_rows, total_rows)?;
        self.cycle_repository.update(&cycle).await?;

        info!(
            cycle_id = %cycle.id(),
            total = progress.total_meetings,
            completed = progress.completed_meetings,
            remaining = progress.remaining_meetings,
            "cycle progress reconciled"
        );

        // 4. Publish event
        let event = CycleProgressSyncedEvent {
            event_id: EventId::new(),
            cycle_id: cycle.id(),
            total_meetings: progress.total_meetings,
            completed_meetings: progress.completed_meetings,
            remaining_meetings: progress.remaining_meetings,
            synced_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(SyncProgressResult { cycle, progress })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Weekday};

    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::{InMemoryCycleRepository, InMemoryMeetingRepository};
    use crate::domain::foundation::{
        ActivityType, InstructorRole, PricingMode, UserId,
    };
    use crate::domain::meeting::Meeting;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn test_metadata() -> CommandMetadata {
        CommandMetadata::new(UserId::new("admin-1").unwrap())
    }

    struct Fixture {
        cycles: Arc<InMemoryCycleRepository>,
        meetings: Arc<InMemoryMeetingRepository>,
        bus: Arc<InMemoryEventBus>,
        handler: SyncProgressHandler,
    }

    fn fixture() -> Fixture {
        let cycles = Arc::new(InMemoryCycleRepository::new());
        let meetings = Arc::new(InMemoryMeetingRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = SyncProgressHandler::new(cycles.clone(), meetings.clone(), bus.clone());
        Fixture {
            cycles,
            meetings,
            bus,
            handler,
        }
    }

    /// Seeds a cycle planned for `total` meetings, with `rows` meeting
    /// records of which `completed` are done.
    async fn seed(fx: &Fixture, total: u32, rows: u32, completed: u32) -> CycleId {
        let mut cycle = Cycle::new(
            "Robotics Juniors",
            Weekday::Mon,
            time(17, 0),
            time(18, 30),
            90,
            date(2025, 1, 6),
            total,
            PricingMode::Private,
            ActivityType::Frontal,
            None,
            None,
        )
        .unwrap();
        cycle.take_events();
        let cycle_id = cycle.id();
        fx.cycles.save(&cycle).await.unwrap();

        for i in 0..rows {
            let mut meeting = Meeting::schedule(
                cycle_id,
                date(2025, 1, 6) + chrono::Duration::weeks(i64::from(i)),
                time(17, 0),
                time(18, 30),
                None,
                InstructorRole::Lead,
                ActivityType::Frontal,
            );
            if i < completed {
                meeting
                    .complete(UserId::new("admin-1").unwrap(), 0)
                    .unwrap();
            }
            fx.meetings.save(&meeting).await.unwrap();
        }
        cycle_id
    }

    #[tokio::test]
    async fn repairs_counters_from_meeting_rows() {
        let fx = fixture();
        let cycle_id = seed(&fx, 10, 10, 4).await;

        let result = fx
            .handler
            .handle(SyncProgressCommand { cycle_id }, test_metadata())
            .await
            .unwrap();

        assert_eq!(result.progress.total_meetings, 10);
        assert_eq!(result.progress.completed_meetings, 4);
        assert_eq!(result.progress.remaining_meetings, 6);
        assert!(result.progress.is_consistent());

        let stored = fx.cycles.get(&cycle_id).unwrap();
        assert_eq!(stored.completed_meetings(), 4);
        assert_eq!(stored.remaining_meetings(), 6);
    }

    #[tokio::test]
    async fn keeps_plan_when_fewer_rows_than_planned() {
        let fx = fixture();
        // Planned for 12, only 10 generated so far.
        let cycle_id = seed(&fx, 12, 10, 3).await;

        let result = fx
            .handler
            .handle(SyncProgressCommand { cycle_id }, test_metadata())
            .await
            .unwrap();

        assert_eq!(result.progress.total_meetings, 12);
        assert_eq!(result.progress.remaining_meetings, 9);
    }

    #[tokio::test]
    async fn grows_total_when_rows_exceed_plan() {
        let fx = fixture();
        // Planned for 8, 11 rows exist after extensions.
        let cycle_id = seed(&fx, 8, 11, 2).await;

        let result = fx
            .handler
            .handle(SyncProgressCommand { cycle_id }, test_metadata())
            .await
            .unwrap();

        assert_eq!(result.progress.total_meetings, 11);
        assert_eq!(result.progress.remaining_meetings, 9);
    }

    #[tokio::test]
    async fn invariant_holds_after_every_sync() {
        let fx = fixture();
        for (total, rows, completed) in [(10, 10, 0), (5, 7, 7), (6, 3, 1)] {
            let cycle_id = seed(&fx, total, rows, completed).await;
            let result = fx
                .handler
                .handle(SyncProgressCommand { cycle_id }, test_metadata())
                .await
                .unwrap();
            assert!(
                result.progress.is_consistent(),
                "total {} rows {} completed {}",
                total,
                rows,
                completed
            );
        }
    }

    #[tokio::test]
    async fn publishes_progress_synced_event() {
        let fx = fixture();
        let cycle_id = seed(&fx, 10, 10, 4).await;

        fx.handler
            .handle(SyncProgressCommand { cycle_id }, test_metadata())
            .await
            .unwrap();

        let events = fx.bus.events_of_type("cycle.progress_synced.v1");
        assert_eq!(events.len(), 1);

        let payload: CycleProgressSyncedEvent = events[0].payload_as().unwrap();
        assert_eq!(payload.completed_meetings, 4);
        assert_eq!(payload.remaining_meetings, 6);
    }

    #[tokio::test]
    async fn fails_when_cycle_not_found() {
        let fx = fixture();

        let result = fx
            .handler
            .handle(
                SyncProgressCommand {
                    cycle_id: CycleId::new(),
                },
                test_metadata(),
            )
            .await;

        assert!(matches!(result, Err(SyncProgressError::CycleNotFound(_))));
    }
}
