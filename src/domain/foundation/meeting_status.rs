//! MeetingStatus enum for the per-meeting lifecycle state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a single meeting.
///
/// Only `Scheduled` meetings may transition; the other three states are
/// terminal for the record that carries them. A postponed meeting is
/// replaced by a freshly scheduled successor rather than reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    Postponed,
}

impl MeetingStatus {
    /// Returns true if the meeting still counts toward a cycle's
    /// remaining-meeting balance.
    pub fn is_pending(&self) -> bool {
        matches!(self, MeetingStatus::Scheduled)
    }
}

impl StateMachine for MeetingStatus {
    fn can_transition_to(&self, target: &MeetingStatus) -> bool {
        use MeetingStatus::*;
        matches!(
            (self, target),
            (Scheduled, Completed) | (Scheduled, Cancelled) | (Scheduled, Postponed)
        )
    }

    fn valid_transitions(&self) -> Vec<MeetingStatus> {
        use MeetingStatus::*;
        match self {
            Scheduled => vec![Completed, Cancelled, Postponed],
            Completed => vec![],
            Cancelled => vec![],
            Postponed => vec![],
        }
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MeetingStatus::Scheduled => "Scheduled",
            MeetingStatus::Completed => "Completed",
            MeetingStatus::Cancelled => "Cancelled",
            MeetingStatus::Postponed => "Postponed",
        };
        write!(f, "{}", s)
    }
}
