//! Meeting domain - single occurrences of a cycle and their lifecycle.

mod aggregate;
mod events;

pub use aggregate::Meeting;
pub use events::MeetingEvent;
