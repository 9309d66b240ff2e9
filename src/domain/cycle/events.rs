//! Domain events recorded by the Cycle aggregate.

use chrono::NaiveDate;

use crate::domain::foundation::{CycleId, Timestamp};

/// Events emitted by cycle state changes.
///
/// Recorded on the aggregate and drained by callers via `take_events`.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleEvent {
    /// A new cycle was created.
    Created {
        cycle_id: CycleId,
        created_at: Timestamp,
    },
    /// Meetings were generated onto the schedule.
    MeetingsGenerated {
        cycle_id: CycleId,
        count: u32,
        truncated: bool,
        end_date: NaiveDate,
    },
    /// A meeting completion moved the counters.
    MeetingCompleted {
        cycle_id: CycleId,
        completed_meetings: u32,
        remaining_meetings: u32,
    },
    /// A meeting cancellation reduced the pending balance.
    MeetingCancelled {
        cycle_id: CycleId,
        remaining_meetings: u32,
    },
    /// Counters were reconciled against actual meeting records.
    ProgressSynced {
        cycle_id: CycleId,
        total_meetings: u32,
        completed_meetings: u32,
        remaining_meetings: u32,
    },
    /// The cycle ran its course.
    Completed { cycle_id: CycleId },
    /// The cycle was called off.
    Cancelled { cycle_id: CycleId },
    /// A copy of the cycle was created at a new start date.
    Duplicated {
        cycle_id: CycleId,
        source_cycle_id: CycleId,
        created_at: Timestamp,
    },
}
