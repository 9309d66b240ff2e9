//! In-memory UpsellLeadRepository for testing.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{CycleId, DomainError, ErrorCode};
use crate::domain::registration::UpsellLead;
use crate::ports::UpsellLeadRepository;

/// In-memory lead store with error injection.
///
/// For tests only; production uses the PostgreSQL adapter.
#[derive(Default)]
pub struct InMemoryUpsellLeadRepository {
    leads: Mutex<Vec<UpsellLead>>,
    fail_writes: Mutex<bool>,
}

impl InMemoryUpsellLeadRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with `DatabaseError`.
    pub fn fail_writes(&self) {
        *self.fail_writes.lock().expect("lock poisoned") = true;
    }

    /// Returns all stored leads (for test assertions).
    pub fn all(&self) -> Vec<UpsellLead> {
        self.leads.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl UpsellLeadRepository for InMemoryUpsellLeadRepository {
    async fn save_all(&self, leads: &[UpsellLead]) -> Result<(), DomainError> {
        if *self.fail_writes.lock().expect("lock poisoned") {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Simulated write failure",
            ));
        }
        self.leads
            .lock()
            .expect("lock poisoned")
            .extend_from_slice(leads);
        Ok(())
    }

    async fn find_by_source_cycle_id(
        &self,
        cycle_id: &CycleId,
    ) -> Result<Vec<UpsellLead>, DomainError> {
        Ok(self
            .leads
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|l| l.source_cycle_id() == *cycle_id)
            .cloned()
            .collect())
    }
}
