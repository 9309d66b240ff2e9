//! RegistrationStatus enum for student enrollments.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a student's registration in a cycle.
///
/// `Registered` is a newly created enrollment awaiting first attendance;
/// `Active` is a confirmed, participating enrollment. Both convert to
/// `Completed` when the owning cycle closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    #[default]
    Registered,
    Active,
    Completed,
    Cancelled,
}

impl RegistrationStatus {
    /// Returns true if the enrollment participates in the cycle's cascade
    /// (gets completed, and produces an upsell lead, when the cycle closes).
    pub fn is_enrolled(&self) -> bool {
        matches!(self, RegistrationStatus::Registered | RegistrationStatus::Active)
    }
}

impl StateMachine for RegistrationStatus {
    fn can_transition_to(&self, target: &RegistrationStatus) -> bool {
        use RegistrationStatus::*;
        matches!(
            (self, target),
            (Registered, Active)
                | (Registered, Completed)
                | (Registered, Cancelled)
                | (Active, Completed)
                | (Active, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<RegistrationStatus> {
        use RegistrationStatus::*;
        match self {
            Registered => vec![Active, Completed, Cancelled],
            Active => vec![Completed, Cancelled],
            Completed => vec![],
            Cancelled => vec![],
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RegistrationStatus::Registered => "Registered",
            RegistrationStatus::Active => "Active",
            RegistrationStatus::Completed => "Completed",
            RegistrationStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_registered() {
        assert_eq!(RegistrationStatus::default(), RegistrationStatus::Registered);
    }

    #[test]
    fn registered_and_active_are_enrolled() {
        assert!(RegistrationStatus::Registered.is_enrolled());
        assert!(RegistrationStatus::Active.is_enrolled());
        assert!(!RegistrationStatus::Completed.is_enrolled());
        assert!(!RegistrationStatus::Cancelled.is_enrolled());
    }

    #[test]
    fn registered_can_become_active() {
        assert!(RegistrationStatus::Registered.can_transition_to(&RegistrationStatus::Active));
    }

    #[test]
    fn enrolled_states_can_complete() {
        assert!(RegistrationStatus::Registered.can_transition_to(&RegistrationStatus::Completed));
        assert!(RegistrationStatus::Active.can_transition_to(&RegistrationStatus::Completed));
    }

    #[test]
    fn completed_is_terminal() {
        assert!(RegistrationStatus::Completed.is_terminal());
    }

    #[test]
    fn cancelled_is_terminal() {
        assert!(RegistrationStatus::Cancelled.is_terminal());
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&RegistrationStatus::Registered).unwrap(),
            "\"registered\""
        );
        assert_eq!(
            serde_json::to_string(&RegistrationStatus::Active).unwrap(),
            "\"active\""
        );
    }
}
