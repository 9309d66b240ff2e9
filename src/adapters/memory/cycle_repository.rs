//! In-memory CycleRepository for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{CycleId, DomainError, ErrorCode};
use crate::ports::CycleRepository;

/// In-memory cycle store with error injection.
///
/// For tests only; production uses the PostgreSQL adapter.
#[derive(Default)]
pub struct InMemoryCycleRepository {
    cycles: Mutex<HashMap<CycleId, Cycle>>,
    fail_writes: Mutex<bool>,
}

impl InMemoryCycleRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with one cycle.
    pub fn with_cycle(cycle: Cycle) -> Self {
        let repo = Self::new();
        repo.cycles
            .lock()
            .expect("InMemoryCycleRepository: lock poisoned")
            .insert(cycle.id(), cycle);
        repo
    }

    /// Makes every subsequent write fail with `DatabaseError`.
    pub fn fail_writes(&self) {
        *self
            .fail_writes
            .lock()
            .expect("InMemoryCycleRepository: lock poisoned") = true;
    }

    /// Returns a snapshot of a stored cycle (for test assertions).
    pub fn get(&self, id: &CycleId) -> Option<Cycle> {
        self.cycles
            .lock()
            .expect("InMemoryCycleRepository: lock poisoned")
            .get(id)
            .cloned()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if *self
            .fail_writes
            .lock()
            .expect("InMemoryCycleRepository: lock poisoned")
        {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Simulated write failure",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CycleRepository for InMemoryCycleRepository {
    async fn save(&self, cycle: &Cycle) -> Result<(), DomainError> {
        self.check_writable()?;
        self.cycles
            .lock()
            .expect("InMemoryCycleRepository: lock poisoned")
            .insert(cycle.id(), cycle.clone());
        Ok(())
    }

    async fn update(&self, cycle: &Cycle) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut cycles = self
            .cycles
            .lock()
            .expect("InMemoryCycleRepository: lock poisoned");
        if !cycles.contains_key(&cycle.id()) {
            return Err(DomainError::new(
                ErrorCode::CycleNotFound,
                format!("Cycle not found: {}", cycle.id()),
            ));
        }
        cycles.insert(cycle.id(), cycle.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CycleId) -> Result<Option<Cycle>, DomainError> {
        Ok(self.get(id))
    }

    async fn exists(&self, id: &CycleId) -> Result<bool, DomainError> {
        Ok(self.get(id).is_some())
    }
}
