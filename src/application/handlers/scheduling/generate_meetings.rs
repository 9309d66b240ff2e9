//! GenerateMeetingsHandler - Command handler for expanding a cycle's
//! recurrence into concrete meetings.
//!
//! Re-entrant: when the cycle already has meetings, generation resumes
//! the day after the latest existing meeting date, so repeated calls are
//! additive and never duplicate earlier dates.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::calendar::HolidaySet;
use crate::domain::cycle::Cycle;
use crate::domain::foundation::{
    domain_event, CommandMetadata, CycleId, DomainError, ErrorCode, EventId, InstructorRole,
    SerializableDomainEvent, Timestamp,
};
use crate::domain::meeting::Meeting;
use crate::domain::scheduling::RecurrenceRule;
use crate::ports::{CycleRepository, EventPublisher, HolidayCalendar, MeetingRepository};

/// Command to generate meetings for a cycle.
#[derive(Debug, Clone)]
pub struct GenerateMeetingsCommand {
    /// The cycle to schedule.
    pub cycle_id: CycleId,
    /// How many meetings to generate; defaults to the gap between the
    /// cycle's planned total and the meetings already on record.
    pub count: Option<u32>,
}

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerateMeetingsResult {
    /// The cycle after counter and end-date updates.
    pub cycle: Cycle,
    /// Dates of the freshly created meetings, ascending.
    pub generated_dates: Vec<NaiveDate>,
    /// True when the attempt bound was hit before reaching the requested
    /// count.
    pub truncated: bool,
    /// Requested meetings that could not be generated.
    pub shortfall: u32,
}

/// Event published when meetings are generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingsGeneratedEvent {
    pub event_id: EventId,
    pub cycle_id: CycleId,
    pub generated_count: u32,
    pub truncated: bool,
    pub generated_at: Timestamp,
}

domain_event!(
    MeetingsGeneratedEvent,
    event_type = "cycle.meetings_generated.v1",
    schema_version = 1,
    aggregate_id = cycle_id,
    aggregate_type = "Cycle",
    occurred_at = generated_at,
    event_id = event_id
);

/// Error type for meeting generation.
#[derive(Debug, Clone)]
pub enum GenerateMeetingsError {
    /// Cycle not found.
    CycleNotFound(CycleId),
    /// Domain error (invalid recurrence input, inactive cycle, storage).
    Domain(DomainError),
}

impl std::fmt::Display for GenerateMeetingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateMeetingsError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            GenerateMeetingsError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GenerateMeetingsError {}

impl From<DomainError> for GenerateMeetingsError {
    fn from(err: DomainError) -> Self {
        GenerateMeetingsError::Domain(err)
    }
}

/// Handler for generating meetings.
pub struct GenerateMeetingsHandler {
    cycle_repository: Arc<dyn CycleRepository>,
    meeting_repository: Arc<dyn MeetingRepository>,
    holiday_calendar: Arc<dyn HolidayCalendar>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl GenerateMeetingsHandler {
    pub fn new(
        cycle_repository: Arc<dyn CycleRepository>,
        meeting_repository: Arc<dyn MeetingRepository>,
        holiday_calendar: Arc<dyn HolidayCalendar>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            cycle_repository,
            meeting_repository,
            holiday_calendar,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: GenerateMeetingsCommand,
        metadata: CommandMetadata,
    ) -> Result<GenerateMeetingsResult, GenerateMeetingsError> {
        // 1. Load the cycle
        let mut cycle = self
            .cycle_repository
            .find_by_id(&cmd.cycle_id)
            .await?
            .ok_or(GenerateMeetingsError::CycleNotFound(cmd.cycle_id))?;

        if !cycle.status().is_mutable() {
            return Err(DomainError::new(
                ErrorCode::CycleNotActive,
                format!("Cycle {} is {}", cycle.id(), cycle.status()),
            )
            .into());
        }

        // 2. Determine how many meetings to generate
        let existing = self
            .meeting_repository
            .count_by_cycle_id(&cmd.cycle_id)
            .await?;
        let requested = cmd
            .count
            .unwrap_or_else(|| cycle.total_meetings().saturating_sub(existing));

        if requested == 0 {
            return Ok(GenerateMeetingsResult {
                cycle,
                generated_dates: Vec::new(),
                truncated: false,
                shortfall: 0,
            });
        }

        // 3. Resume after the latest existing meeting, never duplicating
        //    earlier dates
        let latest = self
            .meeting_repository
            .latest_date_for_cycle(&cmd.cycle_id)
            .await?;
        let effective_start = latest
            .map(|d| d + Duration::days(1))
            .unwrap_or_else(|| cycle.start_date())
            .max(cycle.start_date());

        // 4. Expand the recurrence against the spanned holiday years
        let rule = RecurrenceRule::new(effective_start, cycle.weekday(), requested)?;
        let holidays = self.holidays_spanning(effective_start, requested).await;
        let schedule = rule.expand(&holidays);

        if schedule.truncated {
            warn!(
                cycle_id = %cycle.id(),
                requested,
                generated = schedule.len(),
                "meeting generation truncated by attempt bound"
            );
        }

        if schedule.is_empty() {
            return Ok(GenerateMeetingsResult {
                cycle,
                generated_dates: Vec::new(),
                truncated: true,
                shortfall: schedule.shortfall,
            });
        }

        // 5. Create the meeting records
        let meetings: Vec<Meeting> = schedule
            .dates
            .iter()
            .map(|&date| {
                Meeting::schedule(
                    cycle.id(),
                    date,
                    cycle.start_time(),
                    cycle.end_time(),
                    cycle.primary_instructor_id(),
                    InstructorRole::Lead,
                    cycle.activity_type(),
                )
            })
            .collect();
        self.meeting_repository.save_all(&meetings).await?;

        // 6. Update the cycle's pending balance and end date
        let last_date = schedule
            .last_date()
            .expect("non-empty schedule has a last date");
        cycle.record_meetings_generated(meetings.len() as u32, schedule.truncated, last_date)?;
        self.cycle_repository.update(&cycle).await?;

        info!(
            cycle_id = %cycle.id(),
            generated = meetings.len(),
            end_date = %last_date,
            "meetings generated"
        );

        // 7. Publish event
        let event = MeetingsGeneratedEvent {
            event_id: EventId::new(),
            cycle_id: cycle.id(),
            generated_count: meetings.len() as u32,
            truncated: schedule.truncated,
            generated_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(GenerateMeetingsResult {
            cycle,
            generated_dates: schedule.dates,
            truncated: schedule.truncated,
            shortfall: schedule.shortfall,
        })
    }

    /// Fetches and merges the holiday sets of every year the generation
    /// window can touch. Calendar failures degrade to an empty set; a
    /// missed holiday schedules one meeting too many, which is preferable
    /// to blocking scheduling entirely.
    async fn holidays_spanning(&self, start: NaiveDate, requested: u32) -> HolidaySet {
        let horizon = start + Duration::weeks(i64::from(requested) * 3);
        let mut merged = HolidaySet::empty();
        for year in start.year()..=horizon.year() {
            match self.holiday_calendar.fetch_holidays(year).await {
                Ok(set) => merged = merged.merge(set),
                Err(err) => {
                    warn!(year, error = %err, "holiday fetch failed, continuing without");
                }
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};

    use crate::adapters::calendar::FixedHolidayCalendar;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::{InMemoryCycleRepository, InMemoryMeetingRepository};
    use crate::domain::foundation::{ActivityType, PricingMode, UserId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn monday_cycle(total: u32) -> Cycle {
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
        cycle
    }

    fn test_metadata() -> CommandMetadata {
        CommandMetadata::new(UserId::new("scheduler-1").unwrap()).with_correlation_id("req-gen")
    }

    struct Fixture {
        cycles: Arc<InMemoryCycleRepository>,
        meetings: Arc<InMemoryMeetingRepository>,
        calendar: Arc<FixedHolidayCalendar>,
        bus: Arc<InMemoryEventBus>,
        handler: GenerateMeetingsHandler,
    }

    fn fixture(cycle: Cycle) -> Fixture {
        let cycles = Arc::new(InMemoryCycleRepository::with_cycle(cycle));
        let meetings = Arc::new(InMemoryMeetingRepository::new());
        let calendar = Arc::new(FixedHolidayCalendar::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = GenerateMeetingsHandler::new(
            cycles.clone(),
            meetings.clone(),
            calendar.clone(),
            bus.clone(),
        );
        Fixture {
            cycles,
            meetings,
            calendar,
            bus,
            handler,
        }
    }

    #[tokio::test]
    async fn generates_requested_weekly_dates() {
        let cycle = monday_cycle(3);
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        let result = fx
            .handler
            .handle(
                GenerateMeetingsCommand {
                    cycle_id,
                    count: None,
                },
                test_metadata(),
            )
            .await
            .unwrap();

        assert_eq!(
            result.generated_dates,
            vec![date(2025, 1, 6), date(2025, 1, 13), date(2025, 1, 20)]
        );
        assert!(!result.truncated);
        assert_eq!(fx.meetings.len(), 3);
    }

    #[tokio::test]
    async fn holiday_slot_is_skipped_and_grid_extends() {
        let cycle = monday_cycle(3);
        let cycle_id = cycle.id();
        let fx = fixture(cycle);
        fx.calendar.set_year(2025, [date(2025, 1, 20)]);

        let result = fx
            .handler
            .handle(
                GenerateMeetingsCommand {
                    cycle_id,
                    count: None,
                },
                test_metadata(),
            )
            .await
            .unwrap();

        assert_eq!(
            result.generated_dates,
            vec![date(2025, 1, 6), date(2025, 1, 13), date(2025, 1, 27)]
        );
    }

    #[tokio::test]
    async fn updates_cycle_counters_and_end_date() {
        let cycle = monday_cycle(3);
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        fx.handler
            .handle(
                GenerateMeetingsCommand {
                    cycle_id,
                    count: None,
                },
                test_metadata(),
            )
            .await
            .unwrap();

        let stored = fx.cycles.get(&cycle_id).unwrap();
        assert_eq!(stored.remaining_meetings(), 3);
        assert_eq!(stored.end_date(), Some(date(2025, 1, 20)));
    }

    #[tokio::test]
    async fn second_call_resumes_after_latest_meeting() {
        let cycle = monday_cycle(2);
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        fx.handler
            .handle(
                GenerateMeetingsCommand {
                    cycle_id,
                    count: None,
                },
                test_metadata(),
            )
            .await
            .unwrap();

        // Extend the cycle by two more meetings.
        let second = fx
            .handler
            .handle(
                GenerateMeetingsCommand {
                    cycle_id,
                    count: Some(2),
                },
                test_metadata(),
            )
            .await
            .unwrap();

        assert_eq!(
            second.generated_dates,
            vec![date(2025, 1, 20), date(2025, 1, 27)]
        );
        assert_eq!(fx.meetings.len(), 4);
    }

    #[tokio::test]
    async fn refilling_generates_nothing_new() {
        let cycle = monday_cycle(3);
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        fx.handler
            .handle(
                GenerateMeetingsCommand {
                    cycle_id,
                    count: None,
                },
                test_metadata(),
            )
            .await
            .unwrap();
        let again = fx
            .handler
            .handle(
                GenerateMeetingsCommand {
                    cycle_id,
                    count: None,
                },
                test_metadata(),
            )
            .await
            .unwrap();

        assert!(again.generated_dates.is_empty());
        assert_eq!(fx.meetings.len(), 3);
    }

    #[tokio::test]
    async fn calendar_outage_degrades_to_no_holidays() {
        let cycle = monday_cycle(2);
        let cycle_id = cycle.id();
        let fx = fixture(cycle);
        fx.calendar.fail_fetches();

        let result = fx
            .handler
            .handle(
                GenerateMeetingsCommand {
                    cycle_id,
                    count: None,
                },
                test_metadata(),
            )
            .await
            .unwrap();

        // Generation proceeded as if no dates were blocked.
        assert_eq!(
            result.generated_dates,
            vec![date(2025, 1, 6), date(2025, 1, 13)]
        );
    }

    #[tokio::test]
    async fn pathological_holidays_truncate_with_signal() {
        let cycle = monday_cycle(4);
        let cycle_id = cycle.id();
        let fx = fixture(cycle);
        // Block every Monday within the attempt bound.
        fx.calendar.set_year(
            2025,
            (0..20).map(|w| date(2025, 1, 6) + Duration::weeks(w)),
        );

        let result = fx
            .handler
            .handle(
                GenerateMeetingsCommand {
                    cycle_id,
                    count: None,
                },
                test_metadata(),
            )
            .await
            .unwrap();

        assert!(result.truncated);
        assert_eq!(result.shortfall, 4);
        assert!(result.generated_dates.is_empty());
        assert_eq!(fx.meetings.len(), 0);
    }

    #[tokio::test]
    async fn publishes_generation_event() {
        let cycle = monday_cycle(2);
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        fx.handler
            .handle(
                GenerateMeetingsCommand {
                    cycle_id,
                    count: None,
                },
                test_metadata(),
            )
            .await
            .unwrap();

        let events = fx.bus.events_of_type("cycle.meetings_generated.v1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].aggregate_id, cycle_id.to_string());
        assert_eq!(
            events[0].metadata.correlation_id,
            Some("req-gen".to_string())
        );
    }

    #[tokio::test]
    async fn fails_for_unknown_cycle() {
        let fx = fixture(monday_cycle(2));

        let result = fx
            .handler
            .handle(
                GenerateMeetingsCommand {
                    cycle_id: CycleId::new(),
                    count: None,
                },
                test_metadata(),
            )
            .await;

        assert!(matches!(
            result,
            Err(GenerateMeetingsError::CycleNotFound(_))
        ));
    }

    #[tokio::test]
    async fn fails_for_completed_cycle() {
        let mut cycle = monday_cycle(1);
        cycle.complete().unwrap();
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        let result = fx
            .handler
            .handle(
                GenerateMeetingsCommand {
                    cycle_id,
                    count: Some(1),
                },
                test_metadata(),
            )
            .await;

        match result {
            Err(GenerateMeetingsError::Domain(err)) => {
                assert_eq!(err.code, ErrorCode::CycleNotActive)
            }
            other => panic!("Expected CycleNotActive, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn meetings_carry_cycle_times_and_instructor() {
        let mut cycle = Cycle::new(
            "Chess Club",
            Weekday::Tue,
            time(16, 0),
            time(17, 0),
            60,
            date(2025, 1, 7),
            1,
            PricingMode::Private,
            ActivityType::Online,
            Some(crate::domain::foundation::InstructorId::new()),
            None,
        )
        .unwrap();
        cycle.take_events();
        let instructor = cycle.primary_instructor_id();
        let cycle_id = cycle.id();
        let fx = fixture(cycle);

        fx.handler
            .handle(
                GenerateMeetingsCommand {
                    cycle_id,
                    count: None,
                },
                test_metadata(),
            )
            .await
            .unwrap();

        let stored = fx.meetings.find_by_cycle_id(&cycle_id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].start_time(), time(16, 0));
        assert_eq!(stored[0].instructor_id(), instructor);
        assert_eq!(stored[0].activity_type(), ActivityType::Online);
    }
}
