//! Instructor directory port - read-only rate lookups.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, InstructorId};
use crate::domain::payment::RateTable;

/// Read-only lookup of instructor rate tables.
///
/// Instructor records themselves are managed elsewhere; the scheduling
/// core only needs the hourly rates to price meetings.
#[async_trait]
pub trait InstructorDirectory: Send + Sync {
    /// Fetch the rate table for an instructor.
    ///
    /// Returns `None` when the instructor is unknown; callers decide
    /// whether that is an `InstructorNotFound` error or a zero-pay
    /// fallback.
    async fn rate_table(
        &self,
        instructor_id: &InstructorId,
    ) -> Result<Option<RateTable>, DomainError>;
}
