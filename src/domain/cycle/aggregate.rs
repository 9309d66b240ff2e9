//! Cycle aggregate - a recurring class with a target meeting count.
//!
//! A Cycle owns the counters that track its progress (`total`, `completed`,
//! `remaining` meetings) and the schedule envelope (weekday, times, date
//! range). Meetings are separate aggregates referencing the cycle by ID;
//! the counters are reconciled against actual meeting records by progress
//! synchronization.

use chrono::{NaiveDate, NaiveTime, Weekday};

use crate::domain::foundation::{
    ActivityType, CycleId, CycleStatus, DomainError, ErrorCode, InstructorId, PricingMode,
    StateMachine, Timestamp, ValidationError,
};
use crate::domain::scheduling::{anchor_to_weekday, project_end_date};

use super::{CycleEvent, CycleProgress};

/// The Cycle aggregate root.
#[derive(Debug, Clone)]
pub struct Cycle {
    id: CycleId,
    name: String,
    weekday: Weekday,
    start_time: NaiveTime,
    end_time: NaiveTime,
    duration_minutes: u32,
    start_date: NaiveDate,
    /// Last scheduled meeting date; None until meetings exist.
    end_date: Option<NaiveDate>,
    total_meetings: u32,
    completed_meetings: u32,
    remaining_meetings: u32,
    pricing_mode: PricingMode,
    activity_type: ActivityType,
    status: CycleStatus,
    primary_instructor_id: Option<InstructorId>,
    /// Fixed total instructor budget, divided across meetings when present.
    instructor_budget: Option<i64>,
    created_at: Timestamp,
    updated_at: Timestamp,
    domain_events: Vec<CycleEvent>,
}

impl Cycle {
    /// Creates a new active cycle.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        weekday: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
        duration_minutes: u32,
        start_date: NaiveDate,
        total_meetings: u32,
        pricing_mode: PricingMode,
        activity_type: ActivityType,
        primary_instructor_id: Option<InstructorId>,
        instructor_budget: Option<i64>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name").into());
        }

        let id = CycleId::new();
        let now = Timestamp::now();

        let mut cycle = Self {
            id,
            name,
            weekday,
            start_time,
            end_time,
            duration_minutes,
            start_date,
            end_date: None,
            total_meetings,
            completed_meetings: 0,
            remaining_meetings: 0,
            pricing_mode,
            activity_type,
            status: CycleStatus::Active,
            primary_instructor_id,
            instructor_budget,
            created_at: now,
            updated_at: now,
            domain_events: Vec::new(),
        };

        cycle.record_event(CycleEvent::Created {
            cycle_id: id,
            created_at: now,
        });

        Ok(cycle)
    }

    /// Reconstitutes a cycle from persisted data.
    ///
    /// Used by repository implementations; bypasses domain event recording.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: CycleId,
        name: String,
        weekday: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
        duration_minutes: u32,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        total_meetings: u32,
        completed_meetings: u32,
        remaining_meetings: u32,
        pricing_mode: PricingMode,
        activity_type: ActivityType,
        status: CycleStatus,
        primary_instructor_id: Option<InstructorId>,
        instructor_budget: Option<i64>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            weekday,
            start_time,
            end_time,
            duration_minutes,
            start_date,
            end_date,
            total_meetings,
            completed_meetings,
            remaining_meetings,
            pricing_mode,
            activity_type,
            status,
            primary_instructor_id,
            instructor_budget,
            created_at,
            updated_at,
            domain_events: Vec::new(),
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> CycleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn total_meetings(&self) -> u32 {
        self.total_meetings
    }

    pub fn completed_meetings(&self) -> u32 {
        self.completed_meetings
    }

    pub fn remaining_meetings(&self) -> u32 {
        self.remaining_meetings
    }

    pub fn pricing_mode(&self) -> PricingMode {
        self.pricing_mode
    }

    pub fn activity_type(&self) -> ActivityType {
        self.activity_type
    }

    pub fn status(&self) -> CycleStatus {
        self.status
    }

    pub fn primary_instructor_id(&self) -> Option<InstructorId> {
        self.primary_instructor_id
    }

    pub fn instructor_budget(&self) -> Option<i64> {
        self.instructor_budget
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns true if the given instructor is this cycle's designated
    /// primary instructor.
    pub fn is_primary_instructor(&self, instructor_id: InstructorId) -> bool {
        self.primary_instructor_id == Some(instructor_id)
    }

    /// Returns true when no pending meetings remain.
    pub fn is_exhausted(&self) -> bool {
        self.remaining_meetings == 0 && self.total_meetings > 0
    }

    /// Current counter snapshot.
    pub fn progress(&self) -> CycleProgress {
        CycleProgress::new(
            self.total_meetings,
            self.completed_meetings,
            self.remaining_meetings,
        )
    }

    /// Takes accumulated domain events, clearing the internal buffer.
    pub fn take_events(&mut self) -> Vec<CycleEvent> {
        std::mem::take(&mut self.domain_events)
    }

    // ───────────────────────────────────────────────────────────────
    // Scheduling bookkeeping
    // ───────────────────────────────────────────────────────────────

    /// Records freshly generated meetings: the pending balance grows by
    /// the generated count and the end date moves to the last scheduled
    /// date.
    pub fn record_meetings_generated(
        &mut self,
        count: u32,
        truncated: bool,
        end_date: NaiveDate,
    ) -> Result<(), DomainError> {
        self.ensure_active()?;

        self.remaining_meetings += count;
        self.end_date = Some(end_date);
        self.updated_at = Timestamp::now();

        self.record_event(CycleEvent::MeetingsGenerated {
            cycle_id: self.id,
            count,
            truncated,
            end_date,
        });

        Ok(())
    }

    /// Moves one meeting from pending to completed.
    pub fn meeting_completed(&mut self) -> Result<(), DomainError> {
        self.ensure_active()?;
        if self.remaining_meetings == 0 {
            return Err(DomainError::new(
                ErrorCode::InconsistentCounters,
                format!(
                    "Cycle {} has no remaining meetings to complete",
                    self.id
                ),
            ));
        }

        self.completed_meetings += 1;
        self.remaining_meetings -= 1;
        self.updated_at = Timestamp::now();

        self.record_event(CycleEvent::MeetingCompleted {
            cycle_id: self.id,
            completed_meetings: self.completed_meetings,
            remaining_meetings: self.remaining_meetings,
        });

        Ok(())
    }

    /// Removes one meeting from the pending balance without counting it
    /// as completed (the meeting will never occur).
    pub fn meeting_cancelled(&mut self) -> Result<(), DomainError> {
        self.ensure_active()?;
        if self.remaining_meetings == 0 {
            return Err(DomainError::new(
                ErrorCode::InconsistentCounters,
                format!("Cycle {} has no remaining meetings to cancel", self.id),
            ));
        }

        self.remaining_meetings -= 1;
        self.updated_at = Timestamp::now();

        self.record_event(CycleEvent::MeetingCancelled {
            cycle_id: self.id,
            remaining_meetings: self.remaining_meetings,
        });

        Ok(())
    }

    // ───────────────────────────────────────────────────────────────
    // Reconciliation
    // ───────────────────────────────────────────────────────────────

    /// Reconciles counters against actual meeting records.
    ///
    /// `completed_rows` is the count of meetings in completed status;
    /// `total_rows` the count of all non-deleted meetings. The stored
    /// total is kept when it exceeds the row count, tolerating cycles
    /// planned larger than what was generated so far.
    pub fn apply_progress(
        &mut self,
        completed_rows: u32,
        total_rows: u32,
    ) -> Result<CycleProgress, DomainError> {
        let total = self.total_meetings.max(total_rows);
        if completed_rows > total {
            return Err(DomainError::new(
                ErrorCode::InconsistentCounters,
                format!(
                    "Cycle {} has {} completed meetings but a total of {}",
                    self.id, completed_rows, total
                ),
            )
            .with_detail("completed", completed_rows.to_string())
            .with_detail("total", total.to_string()));
        }

        self.total_meetings = total;
        self.completed_meetings = completed_rows;
        self.remaining_meetings = total - completed_rows;
        self.updated_at = Timestamp::now();

        self.record_event(CycleEvent::ProgressSynced {
            cycle_id: self.id,
            total_meetings: self.total_meetings,
            completed_meetings: self.completed_meetings,
            remaining_meetings: self.remaining_meetings,
        });

        Ok(self.progress())
    }

    // ───────────────────────────────────────────────────────────────
    // Lifecycle
    // ───────────────────────────────────────────────────────────────

    /// Completes the cycle.
    pub fn complete(&mut self) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&CycleStatus::Completed) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cycle {} cannot be completed from {}", self.id, self.status),
            ));
        }

        self.status = CycleStatus::Completed;
        self.updated_at = Timestamp::now();

        self.record_event(CycleEvent::Completed { cycle_id: self.id });

        Ok(())
    }

    /// Cancels the cycle.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&CycleStatus::Cancelled) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cycle {} cannot be cancelled from {}", self.id, self.status),
            ));
        }

        self.status = CycleStatus::Cancelled;
        self.updated_at = Timestamp::now();

        self.record_event(CycleEvent::Cancelled { cycle_id: self.id });

        Ok(())
    }

    // ───────────────────────────────────────────────────────────────
    // Duplication
    // ───────────────────────────────────────────────────────────────

    /// Creates a copy of this cycle starting at a new date.
    ///
    /// The start date is anchored forward to the cycle's weekday and the
    /// end date is projected as `anchor + (total − 1) weeks`. Holidays are
    /// deliberately not consulted: the range is an estimate, refined once
    /// meetings are actually generated. Counters reset to a fresh cycle.
    pub fn duplicate(&self, new_start_date: NaiveDate) -> Cycle {
        let id = CycleId::new();
        let now = Timestamp::now();

        let anchor = anchor_to_weekday(new_start_date, self.weekday);
        let projected_end = project_end_date(anchor, self.total_meetings);

        let mut copy = Cycle {
            id,
            name: self.name.clone(),
            weekday: self.weekday,
            start_time: self.start_time,
            end_time: self.end_time,
            duration_minutes: self.duration_minutes,
            start_date: anchor,
            end_date: Some(projected_end),
            total_meetings: self.total_meetings,
            completed_meetings: 0,
            remaining_meetings: self.total_meetings,
            pricing_mode: self.pricing_mode,
            activity_type: self.activity_type,
            status: CycleStatus::Active,
            primary_instructor_id: self.primary_instructor_id,
            instructor_budget: self.instructor_budget,
            created_at: now,
            updated_at: now,
            domain_events: Vec::new(),
        };

        copy.record_event(CycleEvent::Duplicated {
            cycle_id: id,
            source_cycle_id: self.id,
            created_at: now,
        });

        copy
    }

    // ───────────────────────────────────────────────────────────────
    // Internal helpers
    // ───────────────────────────────────────────────────────────────

    fn ensure_active(&self) -> Result<(), DomainError> {
        if !self.status.is_mutable() {
            return Err(DomainError::new(
                ErrorCode::CycleNotActive,
                format!("Cycle {} is {} and cannot be modified", self.id, self.status),
            ));
        }
        Ok(())
    }

    fn record_event(&mut self, event: CycleEvent) {
        self.domain_events.push(event);
    }
}
