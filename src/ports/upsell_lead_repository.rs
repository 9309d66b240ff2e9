//! Upsell lead repository port.

use async_trait::async_trait;

use crate::domain::foundation::{CycleId, DomainError};
use crate::domain::registration::UpsellLead;

/// Repository port for UpsellLead persistence.
///
/// Creation only: leads are handoff artifacts consumed by external sales
/// tooling, never mutated by this core.
#[async_trait]
pub trait UpsellLeadRepository: Send + Sync {
    /// Save a batch of new leads in one transaction.
    async fn save_all(&self, leads: &[UpsellLead]) -> Result<(), DomainError>;

    /// Find leads produced by a completed cycle.
    async fn find_by_source_cycle_id(
        &self,
        cycle_id: &CycleId,
    ) -> Result<Vec<UpsellLead>, DomainError>;
}
