//! Scheduling domain - weekly recurrence expansion.

mod recurrence;

pub use recurrence::{
    anchor_to_weekday, project_end_date, weekday_from_index, GeneratedSchedule, RecurrenceRule,
};
