//! CycleStatus enum for tracking lifecycle of class cycles.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a class cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl CycleStatus {
    /// Returns true if the cycle can be modified (meetings generated,
    /// counters updated, registrations copied).
    pub fn is_mutable(&self) -> bool {
        matches!(self, CycleStatus::Active)
    }

    /// Returns true if the cycle is finished (completed or cancelled).
    pub fn is_finished(&self) -> bool {
        matches!(self, CycleStatus::Completed | CycleStatus::Cancelled)
    }
}

impl StateMachine for CycleStatus {
    fn can_transition_to(&self, target: &CycleStatus) -> bool {
        use CycleStatus::*;
        matches!((self, target), (Active, Completed) | (Active, Cancelled))
    }

    fn valid_transitions(&self) -> Vec<CycleStatus> {
        use CycleStatus::*;
        match self {
            Active => vec![Completed, Cancelled],
            Completed => vec![],
            Cancelled => vec![],
        }
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CycleStatus::Active => "Active",
            CycleStatus::Completed => "Completed",
            CycleStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}
