//! Domain events recorded by the Meeting aggregate.

use chrono::NaiveDate;

use crate::domain::foundation::{CycleId, MeetingId, Timestamp, UserId};

/// Events emitted by meeting lifecycle transitions.
///
/// Recorded on the aggregate and drained by callers via `take_events`.
#[derive(Debug, Clone, PartialEq)]
pub enum MeetingEvent {
    /// A new meeting was placed on the schedule.
    Scheduled {
        meeting_id: MeetingId,
        cycle_id: CycleId,
        date: NaiveDate,
    },
    /// The meeting took place; financials are final.
    Completed {
        meeting_id: MeetingId,
        completed_by: UserId,
        instructor_payment: i64,
        completed_at: Timestamp,
    },
    /// The meeting will never take place.
    Cancelled {
        meeting_id: MeetingId,
        reason: String,
    },
    /// The meeting was pushed to a new date; a successor carries the slot.
    Postponed {
        meeting_id: MeetingId,
        successor_id: MeetingId,
        new_date: NaiveDate,
    },
    /// Financials were re-derived from current rates without a status change.
    PaymentRecalculated {
        meeting_id: MeetingId,
        instructor_payment: i64,
    },
}
