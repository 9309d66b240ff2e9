//! Conference cleanup port - best-effort teardown of meeting resources.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Deletes external conferencing resources attached to meetings.
///
/// Strictly best-effort from the caller's perspective: the completion
/// cascade logs failures and continues, it never aborts because a
/// conferencing provider was unreachable.
#[async_trait]
pub trait ConferenceCleanup: Send + Sync {
    /// Request deletion of one conferencing resource.
    async fn delete_meeting_resource(&self, resource_id: &str) -> Result<(), DomainError>;
}
