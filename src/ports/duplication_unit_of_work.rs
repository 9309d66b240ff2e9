//! Duplication unit-of-work port - atomic cycle copy with registrations.

use async_trait::async_trait;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::DomainError;
use crate::domain::registration::Registration;

/// Commits a duplicated cycle together with its copied registrations in
/// one transaction.
///
/// A duplicated cycle observable without its copied registrations (or
/// the reverse) is an inconsistent state.
#[async_trait]
pub trait DuplicationUnitOfWork: Send + Sync {
    /// Persist the new cycle and its copied registrations atomically.
    async fn commit_duplication(
        &self,
        cycle: &Cycle,
        registrations: &[Registration],
    ) -> Result<(), DomainError>;
}
