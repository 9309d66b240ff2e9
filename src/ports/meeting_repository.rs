//! Meeting repository port (write side).
//!
//! Defines the contract for persisting and querying Meeting aggregates,
//! including the counting queries that progress reconciliation relies on
//! and the paired write that keeps postponement atomic.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{CycleId, DomainError, MeetingId};
use crate::domain::meeting::Meeting;

/// Repository port for Meeting aggregate persistence.
///
/// Implementations must ensure `save_postponement` writes both records
/// in one transaction: a postponed original without its successor (or
/// the reverse) is an inconsistent state that must never be observable.
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    /// Save a new meeting.
    async fn save(&self, meeting: &Meeting) -> Result<(), DomainError>;

    /// Save a batch of new meetings in one transaction.
    async fn save_all(&self, meetings: &[Meeting]) -> Result<(), DomainError>;

    /// Update an existing meeting.
    ///
    /// # Errors
    ///
    /// - `MeetingNotFound` if the meeting doesn't exist
    async fn update(&self, meeting: &Meeting) -> Result<(), DomainError>;

    /// Persist a postponement pair atomically: the updated original and
    /// its freshly scheduled successor.
    async fn save_postponement(
        &self,
        original: &Meeting,
        successor: &Meeting,
    ) -> Result<(), DomainError>;

    /// Find a meeting by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &MeetingId) -> Result<Option<Meeting>, DomainError>;

    /// Find all meetings of a cycle, ordered by date ascending.
    async fn find_by_cycle_id(&self, cycle_id: &CycleId) -> Result<Vec<Meeting>, DomainError>;

    /// Latest meeting date recorded for a cycle, across all statuses.
    ///
    /// Drives generation re-entrancy: new meetings resume after this date.
    async fn latest_date_for_cycle(
        &self,
        cycle_id: &CycleId,
    ) -> Result<Option<NaiveDate>, DomainError>;

    /// Count all meetings of a cycle.
    async fn count_by_cycle_id(&self, cycle_id: &CycleId) -> Result<u32, DomainError>;

    /// Count completed meetings of a cycle.
    async fn count_completed_by_cycle_id(&self, cycle_id: &CycleId) -> Result<u32, DomainError>;

    /// Find still-scheduled meetings of a cycle dated strictly after the
    /// given date. Used by the completion cascade to find orphans.
    async fn find_scheduled_after(
        &self,
        cycle_id: &CycleId,
        after: NaiveDate,
    ) -> Result<Vec<Meeting>, DomainError>;

    /// Delete a meeting record.
    ///
    /// Only the completion cascade deletes meetings, and only future,
    /// still-scheduled ones.
    async fn delete(&self, id: &MeetingId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn meeting_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn MeetingRepository) {}
    }
}
