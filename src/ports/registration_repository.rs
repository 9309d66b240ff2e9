//! Registration repository port.

use async_trait::async_trait;

use crate::domain::foundation::{CycleId, DomainError};
use crate::domain::registration::Registration;

/// Repository port for Registration persistence.
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Save a batch of new registrations in one transaction.
    ///
    /// Used when duplicating a cycle with the copy-registrations option.
    async fn save_all(&self, registrations: &[Registration]) -> Result<(), DomainError>;

    /// Update a batch of registrations in one transaction.
    ///
    /// Used by the completion cascade to flip enrolled registrations to
    /// completed together with the cycle status change.
    async fn update_all(&self, registrations: &[Registration]) -> Result<(), DomainError>;

    /// Find all registrations of a cycle.
    async fn find_by_cycle_id(
        &self,
        cycle_id: &CycleId,
    ) -> Result<Vec<Registration>, DomainError>;

    /// Find the enrolled (registered or active) registrations of a cycle.
    async fn find_enrolled_by_cycle_id(
        &self,
        cycle_id: &CycleId,
    ) -> Result<Vec<Registration>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn registration_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn RegistrationRepository) {}
    }
}
