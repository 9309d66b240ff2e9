//! CompleteCycleHandler - the cycle completion cascade.
//!
//! Triggered when a meeting completion leaves the cycle's remaining
//! balance at zero, or invoked explicitly. The durable writes (cycle
//! status, registration statuses, upsell leads) commit in one unit of
//! work; conferencing cleanup and the summary notification are
//! best-effort tails that log failures and never unwind the cascade.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{
    domain_event, CommandMetadata, CycleId, DomainError, EventId, MeetingStatus,
    SerializableDomainEvent, Timestamp,
};
use crate::domain::meeting::Meeting;
use crate::domain::registration::{Registration, UpsellLead};
use crate::ports::{
    CompletionNotifier, CompletionUnitOfWork, ConferenceCleanup, CycleRepository, CycleSummary,
    EventPublisher, MeetingRepository, RegistrationRepository,
};

/// Command to complete a cycle.
#[derive(Debug, Clone)]
pub struct CompleteCycleCommand {
    /// The cycle to complete.
    pub cycle_id: CycleId,
}

/// Result of a completed cascade.
#[derive(Debug, Clone)]
pub struct CompleteCycleResult {
    /// The completed cycle.
    pub cycle: Cycle,
    /// Registrations flipped to completed.
    pub completed_registrations: u32,
    /// Upsell leads handed off to sales.
    pub upsell_leads_created: u32,
    /// Future still-scheduled meetings removed.
    pub removed_meetings: u32,
    /// The summary dispatched for human review.
    pub summary: CycleSummary,
}

/// Event published when a cycle completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleCompletedEvent {
    pub event_id: EventId,
    pub cycle_id: CycleId,
    pub completed_registrations: u32,
    pub completed_at: Timestamp,
}

domain_event!(
    CycleCompletedEvent,
    event_type = "cycle.completed.v1",
    schema_version = 1,
    aggregate_id = cycle_id,
    aggregate_type = "Cycle",
    occurred_at = completed_at,
    event_id = event_id
);

/// Error type for completing a cycle.
#[derive(Debug, Clone)]
pub enum CompleteCycleError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (e.g., cycle already completed).
    Domain(DomainError),
}

impl std::fmt::Display for CompleteCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompleteCycleError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            CompleteCycleError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CompleteCycleError {}

impl From<DomainError> for CompleteCycleError {
    fn from(err: DomainError) -> Self {
        CompleteCycleError::Domain(err)
    }
}

/// Handler for the completion cascade.
pub struct CompleteCycleHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    meeting_repository: Arc<dyn MeetingRepository>,
    registration_repository: Arc<dyn RegistrationRepository>,
    unit_of_work: Arc<dyn CompletionUnitOfWork>,
    conference_cleanup: Arc<dyn ConferenceCleanup>,
    completion_notifier: Arc<dyn CompletionNotifier>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CompleteCycleHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        meeting_repository: Arc<dyn MeetingRepository>,
        registration_repository: Arc<dyn RegistrationRepository>,
        unit_of_work: Arc<dyn CompletionUnitOfWork>,
        conference_cleanup: Arc<dyn ConferenceCleanup>,
        completion_notifier: Arc<dyn CompletionNotifier>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            cycle_repository,
            meeting_repository,
            registration_repository,
            unit_of_work,
            conference_cleanup,
            completion_notifier,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CompleteCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<CompleteCycleResult, CompleteCycleError> {
        // 1. Load the cycle and flip its status. A cycle that is already
        //    completed rejects the transition, so the cascade runs at
        //    most once.
        let mut cycle = self
            .cycle_repository
            .find_by_id(&cmd.cycle_id)
            .await?
            .ok_or(CompleteCycleError::CycleNotFound(cmd.cycle_id))?;
        cycle.complete()?;

        // 2. Complete every enrolled registration and cut one upsell
        //    lead per student for sales follow-up.
        let mut registrations: Vec<Registration> = self
            .registration_repository
            .find_enrolled_by_cycle_id(&cmd.cycle_id)
            .await?;
        let mut leads = Vec::with_capacity(registrations.len());
        for registration in &mut registrations {
            registration.complete()?;
            leads.push(UpsellLead::new(
                registration.student_id(),
                registration.customer_id(),
                cycle.name(),
                cycle.id(),
            ));
        }

        // 3. Durable writes commit together.
        self.unit_of_work
            .commit_completion(&cycle, &registrations, &leads)
            .await?;

        info!(
            cycle_id = %cycle.id(),
            registrations = registrations.len(),
            "cycle completed, durable cascade committed"
        );

        // 4. Best-effort: tear down orphaned future meetings.
        let removed = self.remove_orphaned_meetings(&cmd.cycle_id).await;

        // 5. Best-effort: dispatch the financial/attendance summary.
        let summary = self
            .build_summary(&cycle, registrations.len() as u32, leads.len() as u32)
            .await?;
        if let Err(err) = self.completion_notifier.cycle_completed(summary.clone()).await {
            warn!(cycle_id = %cycle.id(), error = %err, "completion notification failed");
        }

        // 6. Publish event
        let event = CycleCompletedEvent {
            event_id: EventId::new(),
            cycle_id: cycle.id(),
            completed_registrations: registrations.len() as u32,
            completed_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(CompleteCycleResult {
            cycle,
            completed_registrations: registrations.len() as u32,
            upsell_leads_created: leads.len() as u32,
            removed_meetings: removed,
            summary,
        })
    }

    /// Deletes still-scheduled meetings dated after today, requesting
    /// conferencing teardown first. Every step is log-and-continue: a
    /// failed external cleanup never aborts the cascade.
    async fn remove_orphaned_meetings(&self, cycle_id: &CycleId) -> u32 {
        let today = Timestamp::now().date();
        let orphans = match self
            .meeting_repository
            .find_scheduled_after(cycle_id, today)
            .await
        {
            Ok(orphans) => orphans,
            Err(err) => {
                error!(%cycle_id, error = %err, "failed to list orphaned meetings");
                return 0;
            }
        };

        let mut removed = 0;
        for meeting in orphans {
            if let Some(resource_id) = meeting.conference_resource_id() {
                if let Err(err) = self
                    .conference_cleanup
                    .delete_meeting_resource(resource_id)
                    .await
                {
                    warn!(
                        meeting_id = %meeting.id(),
                        resource_id,
                        error = %err,
                        "conference cleanup failed, removing meeting anyway"
                    );
                }
            }
            match self.meeting_repository.delete(&meeting.id()).await {
                Ok(()) => removed += 1,
                Err(err) => {
                    error!(meeting_id = %meeting.id(), error = %err, "failed to delete orphaned meeting");
                }
            }
        }
        removed
    }

    /// Aggregates financials and attendance from the now-final meeting set.
    async fn build_summary(
        &self,
        cycle: &Cycle,
        completed_registrations: u32,
        upsell_leads_created: u32,
    ) -> Result<CycleSummary, DomainError> {
        let meetings = self.meeting_repository.find_by_cycle_id(&cycle.id()).await?;

        let completed: Vec<&Meeting> = meetings
            .iter()
            .filter(|m| m.status() == MeetingStatus::Completed)
            .collect();
        let cancelled = meetings
            .iter()
            .filter(|m| m.status() == MeetingStatus::Cancelled)
            .count() as u32;

        let total_revenue: i64 = completed.iter().map(|m| m.revenue()).sum();
        let total_instructor_payment: i64 = completed
            .iter()
            .map(|m| m.instructor_payment().unwrap_or(0))
            .sum();

        Ok(CycleSummary {
            cycle_id: cycle.id(),
            course_name: cycle.name().to_string(),
            total_meetings: meetings.len() as u32,
            completed_meetings: completed.len() as u32,
            cancelled_meetings: cancelled,
            total_revenue,
            total_instructor_payment,
            total_profit: total_revenue - total_instructor_payment,
            completed_registrations,
            upsell_leads_created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveTime, Weekday};

    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::{
        InMemoryCycleRepository, InMemoryMeetingRepository, InMemoryRegistrationRepository,
        InMemoryUnitOfWork, InMemoryUpsellLeadRepository, RecordingCompletionNotifier,
        RecordingConferenceCleanup,
    };
    use crate::domain::foundation::{
        ActivityType, CustomerId, CycleStatus, ErrorCode, InstructorRole, PricingMode,
        RegistrationStatus, StudentId, UserId,
    };
    use crate::ports::UpsellLeadRepository as _;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn test_cycle() -> Cycle {
        let mut cycle = Cycle::new(
            "Robotics Juniors",
            Weekday::Mon,
            time(17, 0),
            time(18, 30),
            90,
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            2,
            PricingMode::Private,
            ActivityType::Frontal,
            None,
            None,
        )
        .unwrap();
        cycle.take_events();
        cycle
    }

    fn test_metadata() -> CommandMetadata {
        CommandMetadata::new(UserId::new("admin-1").unwrap()).with_correlation_id("req-complete")
    }

    struct Fixture {
        cycles: Arc<InMemoryCycleRepository>,
        meetings: Arc<InMemoryMeetingRepository>,
        registrations: Arc<InMemoryRegistrationRepository>,
        leads: Arc<InMemoryUpsellLeadRepository>,
        cleanup: Arc<RecordingConferenceCleanup>,
        notifier: Arc<RecordingCompletionNotifier>,
        bus: Arc<InMemoryEventBus>,
        handler: CompleteCycleHandler,
    }

    fn fixture(cycle: Cycle) -> Fixture {
        let cycles = Arc::new(InMemoryCycleRepository::with_cycle(cycle));
        let meetings = Arc::new(InMemoryMeetingRepository::new());
        let registrations = Arc::new(InMemoryRegistrationRepository::new());
        let leads = Arc::new(InMemoryUpsellLeadRepository::new());
        let cleanup = Arc::new(RecordingConferenceCleanup::new());
        let notifier = Arc::new(RecordingCompletionNotifier::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let uow = Arc::new(InMemoryUnitOfWork::new(
            cycles.clone(),
            registrations.clone(),
            leads.clone(),
        ));
        let handler = CompleteCycleHandler::new(
            cycles.clone(),
            meetings.clone(),
            registrations.clone(),
            uow,
            cleanup.clone(),
            notifier.clone(),
            bus.clone(),
        );
        Fixture {
            cycles,
            meetings,
            registrations,
            leads,
            cleanup,
            notifier,
            bus,
            handler,
        }
    }

    fn enrolled_registration(cycle_id: CycleId, activate: bool) -> Registration {
        let mut reg = Registration::new(cycle_id, StudentId::new(), CustomerId::new());
        if activate {
            reg.activate().unwrap();
        }
        reg
    }

    fn future_meeting(cycle_id: CycleId, resource: Option<&str>) -> Meeting {
        let mut meeting = Meeting::schedule(
            cycle_id,
            Timestamp::now().date() + Duration::days(14),
            time(17, 0),
            time(18, 30),
            None,
            InstructorRole::Lead,
            ActivityType::Online,
        );
        if let Some(id) = resource {
            meeting.set_conference_resource(id);
        }
        meeting
    }

    #[tokio::test]
    async fn flips_cycle_status_to_completed() {
        let cycle = test_cycle();
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        let result = fx
            .handler
            .handle(CompleteCycleCommand { cycle_id }, test_metadata())
            .await
            .unwrap();

        assert_eq!(result.cycle.status(), CycleStatus::Completed);
        assert_eq!(
            fx.cycles.get(&cycle_id).unwrap().status(),
            CycleStatus::Completed
        );
    }

    #[tokio::test]
    async fn completes_enrolled_registrations_and_cuts_leads() {
        let cycle = test_cycle();
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        let reg1 = enrolled_registration(cycle_id, false);
        let reg2 = enrolled_registration(cycle_id, true);
        let mut finished = enrolled_registration(cycle_id, true);
        finished.complete().unwrap();
        fx.registrations
            .save_all(&[reg1.clone(), reg2.clone(), finished])
            .await
            .unwrap();

        let result = fx
            .handler
            .handle(CompleteCycleCommand { cycle_id }, test_metadata())
            .await
            .unwrap();

        assert_eq!(result.completed_registrations, 2);
        assert_eq!(result.upsell_leads_created, 2);
        assert_eq!(
            fx.registrations.get(&reg1.id()).unwrap().status(),
            RegistrationStatus::Completed
        );
        assert_eq!(
            fx.registrations.get(&reg2.id()).unwrap().status(),
            RegistrationStatus::Completed
        );

        let leads = fx.leads.find_by_source_cycle_id(&cycle_id).await.unwrap();
        assert_eq!(leads.len(), 2);
        assert!(leads.iter().all(|l| l.course_name() == "Robotics Juniors"));
    }

    #[tokio::test]
    async fn removes_future_scheduled_meetings_and_cleans_resources() {
        let cycle = test_cycle();
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        let orphan = future_meeting(cycle_id, Some("conf-123"));
        let orphan_id = orphan.id();
        fx.meetings.save(&orphan).await.unwrap();

        let result = fx
            .handler
            .handle(CompleteCycleCommand { cycle_id }, test_metadata())
            .await
            .unwrap();

        assert_eq!(result.removed_meetings, 1);
        assert!(fx.meetings.get(&orphan_id).is_none());
        assert_eq!(fx.cleanup.deleted(), vec!["conf-123".to_string()]);
    }

    #[tokio::test]
    async fn past_and_terminal_meetings_survive_the_cascade() {
        let cycle = test_cycle();
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        // A completed past meeting and a cancelled one must stay.
        let mut past = Meeting::schedule(
            cycle_id,
            Timestamp::now().date() - Duration::days(7),
            time(17, 0),
            time(18, 30),
            None,
            InstructorRole::Lead,
            ActivityType::Frontal,
        );
        past.complete(UserId::new("admin-1").unwrap(), 180).unwrap();
        let mut cancelled = future_meeting(cycle_id, None);
        cancelled.cancel("low enrollment").unwrap();
        fx.meetings.save(&past).await.unwrap();
        fx.meetings.save(&cancelled).await.unwrap();

        let result = fx
            .handler
            .handle(CompleteCycleCommand { cycle_id }, test_metadata())
            .await
            .unwrap();

        assert_eq!(result.removed_meetings, 0);
        assert_eq!(fx.meetings.len(), 2);
    }

    #[tokio::test]
    async fn cleanup_failure_does_not_abort_cascade() {
        let cycle = test_cycle();
        let cycle_id = cycle.id();
        let fx = fixture(cycle);
        fx.cleanup.fail_deletions();

        let orphan = future_meeting(cycle_id, Some("conf-zzz"));
        fx.meetings.save(&orphan).await.unwrap();

        let result = fx
            .handler
            .handle(CompleteCycleCommand { cycle_id }, test_metadata())
            .await
            .unwrap();

        // Meeting is still removed; the external teardown just logged.
        assert_eq!(result.removed_meetings, 1);
        assert_eq!(result.cycle.status(), CycleStatus::Completed);
    }

    #[tokio::test]
    async fn notification_failure_does_not_abort_cascade() {
        let cycle = test_cycle();
        let cycle_id = cycle.id();
        let fx = fixture(cycle);
        fx.notifier.fail_dispatch();

        let result = fx
            .handler
            .handle(CompleteCycleCommand { cycle_id }, test_metadata())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn dispatches_summary_with_financial_aggregates() {
        let cycle = test_cycle();
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        let mut done = Meeting::schedule(
            cycle_id,
            Timestamp::now().date() - Duration::days(7),
            time(17, 0),
            time(18, 30),
            None,
            InstructorRole::Lead,
            ActivityType::Frontal,
        );
        done.set_revenue(500);
        done.complete(UserId::new("admin-1").unwrap(), 180).unwrap();
        fx.meetings.save(&done).await.unwrap();

        fx.handler
            .handle(CompleteCycleCommand { cycle_id }, test_metadata())
            .await
            .unwrap();

        let summaries = fx.notifier.summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].completed_meetings, 1);
        assert_eq!(summaries[0].total_revenue, 500);
        assert_eq!(summaries[0].total_instructor_payment, 180);
        assert_eq!(summaries[0].total_profit, 320);
    }

    #[tokio::test]
    async fn publishes_cycle_completed_event() {
        let cycle = test_cycle();
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        fx.handler
            .handle(CompleteCycleCommand { cycle_id }, test_metadata())
            .await
            .unwrap();

        let events = fx.bus.events_of_type("cycle.completed.v1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].aggregate_id, cycle_id.to_string());
    }

    #[tokio::test]
    async fn second_completion_is_rejected() {
        let cycle = test_cycle();
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        fx.handler
            .handle(CompleteCycleCommand { cycle_id }, test_metadata())
            .await
            .unwrap();
        let second = fx
            .handler
            .handle(CompleteCycleCommand { cycle_id }, test_metadata())
            .await;

        match second {
            Err(CompleteCycleError::Domain(err)) => {
                assert_eq!(err.code, ErrorCode::InvalidStateTransition)
            }
            other => panic!("Expected InvalidStateTransition, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn fails_when_cycle_not_found() {
        let fx = fixture(test_cycle());

        let result = fx
            .handler
            .handle(
                CompleteCycleCommand {
                    cycle_id: CycleId::new(),
                },
                test_metadata(),
            )
            .await;

        assert!(matches!(result, Err(CompleteCycleError::CycleNotFound(_))));
    }

    #[tokio::test]
    async fn durable_write_failure_aborts_before_side_effects() {
        let cycle = test_cycle();
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        let orphan = future_meeting(cycle_id, Some("conf-abc"));
        fx.meetings.save(&orphan).await.unwrap();
        fx.cycles.fail_writes();

        let result = fx
            .handler
            .handle(CompleteCycleCommand { cycle_id }, test_metadata())
            .await;

        assert!(result.is_err());
        // No best-effort tail ran: orphan intact, nothing cleaned up,
        // nothing notified.
        assert_eq!(fx.meetings.len(), 1);
        assert!(fx.cleanup.deleted().is_empty());
        assert!(fx.notifier.summaries().is_empty());
    }
}
