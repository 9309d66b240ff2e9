//! In-memory unit-of-work adapters for testing.
//!
//! Delegates the grouped writes to the underlying in-memory repositories.
//! True atomicity is a property of the PostgreSQL adapter; here the writes
//! are applied sequentially, which is sufficient for single-threaded tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::DomainError;
use crate::domain::registration::{Registration, UpsellLead};
use crate::ports::{
    CompletionUnitOfWork, CycleRepository, DuplicationUnitOfWork, RegistrationRepository,
    UpsellLeadRepository,
};

use super::{
    InMemoryCycleRepository, InMemoryRegistrationRepository, InMemoryUpsellLeadRepository,
};

/// In-memory unit of work over the in-memory repositories.
pub struct InMemoryUnitOfWork {
    cycles: Arc<InMemoryCycleRepository>,
    registrations: Arc<InMemoryRegistrationRepository>,
    leads: Arc<InMemoryUpsellLeadRepository>,
}

impl InMemoryUnitOfWork {
    /// Creates a unit of work delegating to the given repositories.
    pub fn new(
        cycles: Arc<InMemoryCycleRepository>,
        registrations: Arc<InMemoryRegistrationRepository>,
        leads: Arc<InMemoryUpsellLeadRepository>,
    ) -> Self {
        Self {
            cycles,
            registrations,
            leads,
        }
    }
}

#[async_trait]
impl CompletionUnitOfWork for InMemoryUnitOfWork {
    async fn commit_completion(
        &self,
        cycle: &Cycle,
        registrations: &[Registration],
        leads: &[UpsellLead],
    ) -> Result<(), DomainError> {
        self.cycles.update(cycle).await?;
        self.registrations.update_all(registrations).await?;
        self.leads.save_all(leads).await?;
        Ok(())
    }
}

#[async_trait]
impl DuplicationUnitOfWork for InMemoryUnitOfWork {
    async fn commit_duplication(
        &self,
        cycle: &Cycle,
        registrations: &[Registration],
    ) -> Result<(), DomainError> {
        self.cycles.save(cycle).await?;
        self.registrations.save_all(registrations).await?;
        Ok(())
    }
}
