//! Cycle repository port (write side).
//!
//! Defines the contract for persisting and retrieving Cycle aggregates.
//! Implementations handle the actual database operations.

use async_trait::async_trait;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{CycleId, DomainError};

/// Repository port for Cycle aggregate persistence.
#[async_trait]
pub trait CycleRepository: Send + Sync {
    /// Save a new cycle.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, cycle: &Cycle) -> Result<(), DomainError>;

    /// Update an existing cycle.
    ///
    /// # Errors
    ///
    /// - `CycleNotFound` if the cycle doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, cycle: &Cycle) -> Result<(), DomainError>;

    /// Find a cycle by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &CycleId) -> Result<Option<Cycle>, DomainError>;

    /// Check if a cycle exists.
    async fn exists(&self, id: &CycleId) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn cycle_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn CycleRepository) {}
    }
}
