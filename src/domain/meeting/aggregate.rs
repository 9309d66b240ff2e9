//! Meeting aggregate - one dated occurrence of a cycle.
//!
//! A meeting moves through a small state machine: `Scheduled` initially,
//! then exactly one of `Completed`, `Cancelled`, or `Postponed`. The
//! postponement transition spawns a freshly scheduled successor meeting
//! linked to the original in both directions.

use chrono::{NaiveDate, NaiveTime};

use crate::domain::foundation::{
    ActivityType, CycleId, DomainError, ErrorCode, InstructorId, InstructorRole, MeetingId,
    MeetingStatus, StateMachine, Timestamp, UserId,
};

use super::MeetingEvent;

/// The Meeting aggregate root.
#[derive(Debug, Clone)]
pub struct Meeting {
    id: MeetingId,
    cycle_id: CycleId,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    status: MeetingStatus,
    instructor_id: Option<InstructorId>,
    instructor_role: InstructorRole,
    activity_type: ActivityType,
    /// None until financials are finalized (normally at completion).
    instructor_payment: Option<i64>,
    revenue: i64,
    profit: i64,
    rescheduled_to: Option<MeetingId>,
    rescheduled_from: Option<MeetingId>,
    completed_at: Option<Timestamp>,
    completed_by: Option<UserId>,
    cancellation_reason: Option<String>,
    /// External conferencing resource backing this meeting, if any.
    conference_resource_id: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
    domain_events: Vec<MeetingEvent>,
}

impl Meeting {
    /// Schedules a new meeting for a cycle.
    #[allow(clippy::too_many_arguments)]
    pub fn schedule(
        cycle_id: CycleId,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        instructor_id: Option<InstructorId>,
        instructor_role: InstructorRole,
        activity_type: ActivityType,
    ) -> Self {
        let id = MeetingId::new();
        let now = Timestamp::now();

        let mut meeting = Self {
            id,
            cycle_id,
            date,
            start_time,
            end_time,
            status: MeetingStatus::Scheduled,
            instructor_id,
            instructor_role,
            activity_type,
            instructor_payment: None,
            revenue: 0,
            profit: 0,
            rescheduled_to: None,
            rescheduled_from: None,
            completed_at: None,
            completed_by: None,
            cancellation_reason: None,
            conference_resource_id: None,
            created_at: now,
            updated_at: now,
            domain_events: Vec::new(),
        };

        meeting.record_event(MeetingEvent::Scheduled {
            meeting_id: id,
            cycle_id,
            date,
        });

        meeting
    }

    /// Reconstitutes a meeting from persisted data.
    ///
    /// Used by repository implementations; bypasses domain event recording.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: MeetingId,
        cycle_id: CycleId,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        status: MeetingStatus,
        instructor_id: Option<InstructorId>,
        instructor_role: InstructorRole,
        activity_type: ActivityType,
        instructor_payment: Option<i64>,
        revenue: i64,
        profit: i64,
        rescheduled_to: Option<MeetingId>,
        rescheduled_from: Option<MeetingId>,
        completed_at: Option<Timestamp>,
        completed_by: Option<UserId>,
        cancellation_reason: Option<String>,
        conference_resource_id: Option<String>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            cycle_id,
            date,
            start_time,
            end_time,
            status,
            instructor_id,
            instructor_role,
            activity_type,
            instructor_payment,
            revenue,
            profit,
            rescheduled_to,
            rescheduled_from,
            completed_at,
            completed_by,
            cancellation_reason,
            conference_resource_id,
            created_at,
            updated_at,
            domain_events: Vec::new(),
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> MeetingId {
        self.id
    }

    pub fn cycle_id(&self) -> CycleId {
        self.cycle_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    pub fn status(&self) -> MeetingStatus {
        self.status
    }

    pub fn instructor_id(&self) -> Option<InstructorId> {
        self.instructor_id
    }

    pub fn instructor_role(&self) -> InstructorRole {
        self.instructor_role
    }

    pub fn activity_type(&self) -> ActivityType {
        self.activity_type
    }

    /// Returns the finalized instructor payment, if financials are final.
    pub fn instructor_payment(&self) -> Option<i64> {
        self.instructor_payment
    }

    pub fn revenue(&self) -> i64 {
        self.revenue
    }

    pub fn profit(&self) -> i64 {
        self.profit
    }

    pub fn rescheduled_to(&self) -> Option<MeetingId> {
        self.rescheduled_to
    }

    pub fn rescheduled_from(&self) -> Option<MeetingId> {
        self.rescheduled_from
    }

    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    pub fn completed_by(&self) -> Option<&UserId> {
        self.completed_by.as_ref()
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    pub fn conference_resource_id(&self) -> Option<&str> {
        self.conference_resource_id.as_deref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Meeting length in minutes, derived from the scheduled times.
    pub fn duration_minutes(&self) -> u32 {
        (self.end_time - self.start_time).num_minutes().max(0) as u32
    }

    /// Takes accumulated domain events, clearing the internal buffer.
    pub fn take_events(&mut self) -> Vec<MeetingEvent> {
        std::mem::take(&mut self.domain_events)
    }

    // ───────────────────────────────────────────────────────────────
    // Mutations
    // ───────────────────────────────────────────────────────────────

    /// Records the expected revenue for this meeting.
    pub fn set_revenue(&mut self, revenue: i64) {
        self.revenue = revenue;
        self.profit = revenue - self.instructor_payment.unwrap_or(0);
        self.updated_at = Timestamp::now();
    }

    /// Attaches an external conferencing resource to this meeting.
    pub fn set_conference_resource(&mut self, resource_id: impl Into<String>) {
        self.conference_resource_id = Some(resource_id.into());
        self.updated_at = Timestamp::now();
    }

    /// Marks the meeting as completed.
    ///
    /// Stamps the completion moment and actor. Financials are finalized
    /// with the supplied payment unless a payment was already finalized
    /// earlier, in which case the existing amount is kept.
    pub fn complete(&mut self, actor: UserId, instructor_payment: i64) -> Result<(), DomainError> {
        self.ensure_transition(MeetingStatus::Completed)?;

        let now = Timestamp::now();
        self.status = MeetingStatus::Completed;
        self.completed_at = Some(now);
        self.completed_by = Some(actor.clone());
        if self.instructor_payment.is_none() {
            self.instructor_payment = Some(instructor_payment);
        }
        self.profit = self.revenue - self.instructor_payment.unwrap_or(0);
        self.updated_at = now;

        self.record_event(MeetingEvent::Completed {
            meeting_id: self.id,
            completed_by: actor,
            instructor_payment: self.instructor_payment.unwrap_or(0),
            completed_at: now,
        });

        Ok(())
    }

    /// Marks the meeting as cancelled, recording the reason.
    pub fn cancel(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        self.ensure_transition(MeetingStatus::Cancelled)?;

        let reason = reason.into();
        self.status = MeetingStatus::Cancelled;
        self.cancellation_reason = Some(reason.clone());
        self.updated_at = Timestamp::now();

        self.record_event(MeetingEvent::Cancelled {
            meeting_id: self.id,
            reason,
        });

        Ok(())
    }

    /// Postpones the meeting to a new date, returning the successor.
    ///
    /// The successor is a freshly scheduled meeting carrying the same
    /// cycle, instructor, role, and activity type. Times default to the
    /// original's when not overridden. Original and successor are linked
    /// in both directions; the caller persists the pair atomically.
    pub fn postpone(
        &mut self,
        new_date: NaiveDate,
        new_start: Option<NaiveTime>,
        new_end: Option<NaiveTime>,
    ) -> Result<Meeting, DomainError> {
        self.ensure_transition(MeetingStatus::Postponed)?;

        let mut successor = Meeting::schedule(
            self.cycle_id,
            new_date,
            new_start.unwrap_or(self.start_time),
            new_end.unwrap_or(self.end_time),
            self.instructor_id,
            self.instructor_role,
            self.activity_type,
        );
        successor.rescheduled_from = Some(self.id);
        successor.revenue = self.revenue;

        self.status = MeetingStatus::Postponed;
        self.rescheduled_to = Some(successor.id);
        self.updated_at = Timestamp::now();

        self.record_event(MeetingEvent::Postponed {
            meeting_id: self.id,
            successor_id: successor.id,
            new_date,
        });

        Ok(successor)
    }

    /// Re-derives financials from a freshly computed payment without
    /// changing status. Valid in any state; used when rates change after
    /// the fact.
    pub fn recalculate_payment(&mut self, instructor_payment: i64) {
        self.instructor_payment = Some(instructor_payment);
        self.profit = self.revenue - instructor_payment;
        self.updated_at = Timestamp::now();

        self.record_event(MeetingEvent::PaymentRecalculated {
            meeting_id: self.id,
            instructor_payment,
        });
    }

    // ───────────────────────────────────────────────────────────────
    // Internal helpers
    // ───────────────────────────────────────────────────────────────

    fn ensure_transition(&self, target: MeetingStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&target) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Meeting {} cannot move from {} to {}",
                    self.id, self.status, target
                ),
            )
            .with_detail("meeting_id", self.id.to_string())
            .with_detail("from", self.status.to_string())
            .with_detail("to", target.to_string()));
        }
        Ok(())
    }

    fn record_event(&mut self, event: MeetingEvent) {
        self.domain_events.push(event);
    }
}
