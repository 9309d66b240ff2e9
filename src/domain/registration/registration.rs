//! Registration record - a student's enrollment in a cycle.

use crate::domain::foundation::{
    CustomerId, CycleId, DomainError, ErrorCode, RegistrationId, RegistrationStatus, StateMachine,
    StudentId, Timestamp,
};

/// A student's enrollment in a cycle.
///
/// Registrations are consumed by the completion cascade (flipped to
/// `Completed`, each producing an upsell lead) and copied when a cycle
/// is duplicated with the copy-registrations option.
#[derive(Debug, Clone)]
pub struct Registration {
    id: RegistrationId,
    cycle_id: CycleId,
    student_id: StudentId,
    customer_id: CustomerId,
    status: RegistrationStatus,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Registration {
    /// Creates a new registration in `Registered` status.
    pub fn new(cycle_id: CycleId, student_id: StudentId, customer_id: CustomerId) -> Self {
        let now = Timestamp::now();
        Self {
            id: RegistrationId::new(),
            cycle_id,
            student_id,
            customer_id,
            status: RegistrationStatus::Registered,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a registration from persisted data.
    pub fn reconstitute(
        id: RegistrationId,
        cycle_id: CycleId,
        student_id: StudentId,
        customer_id: CustomerId,
        status: RegistrationStatus,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            cycle_id,
            student_id,
            customer_id,
            status,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> RegistrationId {
        self.id
    }

    pub fn cycle_id(&self) -> CycleId {
        self.cycle_id
    }

    pub fn student_id(&self) -> StudentId {
        self.student_id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn status(&self) -> RegistrationStatus {
        self.status
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Marks the enrollment as completed (cycle ran its course).
    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.transition(RegistrationStatus::Completed)
    }

    /// Activates a fresh enrollment.
    pub fn activate(&mut self) -> Result<(), DomainError> {
        self.transition(RegistrationStatus::Active)
    }

    /// Cancels the enrollment.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.transition(RegistrationStatus::Cancelled)
    }

    /// Copies this enrollment onto another cycle, reset to `Registered`.
    pub fn copy_to_cycle(&self, cycle_id: CycleId) -> Registration {
        Registration::new(cycle_id, self.student_id, self.customer_id)
    }

    fn transition(&mut self, target: RegistrationStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&target) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Registration {} cannot move from {} to {}",
                    self.id, self.status, target
                ),
            ));
        }
        self.status = target;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration::new(CycleId::new(), StudentId::new(), CustomerId::new())
    }

    #[test]
    fn new_registration_is_registered() {
        let reg = registration();
        assert_eq!(reg.status(), RegistrationStatus::Registered);
    }

    #[test]
    fn registered_can_complete_directly() {
        let mut reg = registration();
        assert!(reg.complete().is_ok());
        assert_eq!(reg.status(), RegistrationStatus::Completed);
    }

    #[test]
    fn active_can_complete() {
        let mut reg = registration();
        reg.activate().unwrap();
        assert!(reg.complete().is_ok());
    }

    #[test]
    fn cancelled_cannot_complete() {
        let mut reg = registration();
        reg.cancel().unwrap();

        let err = reg.complete().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn copy_to_cycle_resets_status_and_identity() {
        let mut reg = registration();
        reg.activate().unwrap();

        let target_cycle = CycleId::new();
        let copy = reg.copy_to_cycle(target_cycle);

        assert_ne!(copy.id(), reg.id());
        assert_eq!(copy.cycle_id(), target_cycle);
        assert_eq!(copy.student_id(), reg.student_id());
        assert_eq!(copy.customer_id(), reg.customer_id());
        assert_eq!(copy.status(), RegistrationStatus::Registered);
    }
}
