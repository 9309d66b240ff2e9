//! UpsellLead record - sales handoff created when a cycle completes.

use crate::domain::foundation::{CustomerId, CycleId, StudentId, Timestamp, UpsellLeadId};

/// A sales follow-up artifact for a customer whose course just ended.
///
/// Created by the completion cascade, one per enrolled registration.
/// This core only creates leads; qualification and follow-up live in
/// external sales tooling.
#[derive(Debug, Clone)]
pub struct UpsellLead {
    id: UpsellLeadId,
    student_id: StudentId,
    customer_id: CustomerId,
    course_name: String,
    source_cycle_id: CycleId,
    created_at: Timestamp,
}

impl UpsellLead {
    /// Creates a lead for a student whose cycle just completed.
    pub fn new(
        student_id: StudentId,
        customer_id: CustomerId,
        course_name: impl Into<String>,
        source_cycle_id: CycleId,
    ) -> Self {
        Self {
            id: UpsellLeadId::new(),
            student_id,
            customer_id,
            course_name: course_name.into(),
            source_cycle_id,
            created_at: Timestamp::now(),
        }
    }

    /// Reconstitutes a lead from persisted data.
    pub fn reconstitute(
        id: UpsellLeadId,
        student_id: StudentId,
        customer_id: CustomerId,
        course_name: String,
        source_cycle_id: CycleId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            student_id,
            customer_id,
            course_name,
            source_cycle_id,
            created_at,
        }
    }

    pub fn id(&self) -> UpsellLeadId {
        self.id
    }

    pub fn student_id(&self) -> StudentId {
        self.student_id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn course_name(&self) -> &str {
        &self.course_name
    }

    pub fn source_cycle_id(&self) -> CycleId {
        self.source_cycle_id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_references_student_customer_and_course() {
        let student = StudentId::new();
        let customer = CustomerId::new();
        let cycle = CycleId::new();

        let lead = UpsellLead::new(student, customer, "Robotics Juniors", cycle);

        assert_eq!(lead.student_id(), student);
        assert_eq!(lead.customer_id(), customer);
        assert_eq!(lead.course_name(), "Robotics Juniors");
        assert_eq!(lead.source_cycle_id(), cycle);
    }

    #[test]
    fn leads_get_unique_identities() {
        let lead1 = UpsellLead::new(StudentId::new(), CustomerId::new(), "A", CycleId::new());
        let lead2 = UpsellLead::new(StudentId::new(), CustomerId::new(), "A", CycleId::new());
        assert_ne!(lead1.id(), lead2.id());
    }
}
