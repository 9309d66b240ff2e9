//! Completion unit-of-work port - the cascade's durable write boundary.

use async_trait::async_trait;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::DomainError;
use crate::domain::registration::{Registration, UpsellLead};

/// Commits the must-succeed part of the completion cascade in one
/// transaction: the completed cycle, the completed registrations, and
/// the freshly created upsell leads.
///
/// Best-effort side effects (conferencing cleanup, notification) stay
/// outside this boundary so the transaction never depends on a network
/// call succeeding.
#[async_trait]
pub trait CompletionUnitOfWork: Send + Sync {
    /// Persist the cascade's durable writes atomically.
    ///
    /// Either all three groups commit, or none are observable.
    async fn commit_completion(
        &self,
        cycle: &Cycle,
        registrations: &[Registration],
        leads: &[UpsellLead],
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn completion_unit_of_work_is_object_safe() {
        fn _accepts_dyn(_uow: &dyn CompletionUnitOfWork) {}
    }
}
