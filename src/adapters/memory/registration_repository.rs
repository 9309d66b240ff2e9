//! In-memory RegistrationRepository for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{CycleId, DomainError, ErrorCode, RegistrationId};
use crate::domain::registration::Registration;
use crate::ports::RegistrationRepository;

/// In-memory registration store with error injection.
///
/// For tests only; production uses the PostgreSQL adapter.
#[derive(Default)]
pub struct InMemoryRegistrationRepository {
    registrations: Mutex<HashMap<RegistrationId, Registration>>,
    fail_writes: Mutex<bool>,
}

impl InMemoryRegistrationRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with registrations.
    pub fn with_registrations(registrations: impl IntoIterator<Item = Registration>) -> Self {
        let repo = Self::new();
        {
            let mut store = repo.registrations.lock().expect("lock poisoned");
            for registration in registrations {
                store.insert(registration.id(), registration);
            }
        }
        repo
    }

    /// Makes every subsequent write fail with `DatabaseError`.
    pub fn fail_writes(&self) {
        *self.fail_writes.lock().expect("lock poisoned") = true;
    }

    /// Returns a snapshot of a stored registration (for test assertions).
    pub fn get(&self, id: &RegistrationId) -> Option<Registration> {
        self.registrations
            .lock()
            .expect("lock poisoned")
            .get(id)
            .cloned()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if *self.fail_writes.lock().expect("lock poisoned") {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Simulated write failure",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryRegistrationRepository {
    async fn save_all(&self, registrations: &[Registration]) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut store = self.registrations.lock().expect("lock poisoned");
        for registration in registrations {
            store.insert(registration.id(), registration.clone());
        }
        Ok(())
    }

    async fn update_all(&self, registrations: &[Registration]) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut store = self.registrations.lock().expect("lock poisoned");
        for registration in registrations {
            if !store.contains_key(&registration.id()) {
                return Err(DomainError::new(
                    ErrorCode::RegistrationNotFound,
                    format!("Registration not found: {}", registration.id()),
                ));
            }
            store.insert(registration.id(), registration.clone());
        }
        Ok(())
    }

    async fn find_by_cycle_id(
        &self,
        cycle_id: &CycleId,
    ) -> Result<Vec<Registration>, DomainError> {
        Ok(self
            .registrations
            .lock()
            .expect("lock poisoned")
            .values()
            .filter(|r| r.cycle_id() == *cycle_id)
            .cloned()
            .collect())
    }

    async fn find_enrolled_by_cycle_id(
        &self,
        cycle_id: &CycleId,
    ) -> Result<Vec<Registration>, DomainError> {
        Ok(self
            .registrations
            .lock()
            .expect("lock poisoned")
            .values()
            .filter(|r| r.cycle_id() == *cycle_id && r.status().is_enrolled())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CustomerId, StudentId};

    #[tokio::test]
    async fn enrolled_filter_excludes_finished_enrollments() {
        let cycle_id = CycleId::new();
        let active = Registration::new(cycle_id, StudentId::new(), CustomerId::new());
        let mut cancelled = Registration::new(cycle_id, StudentId::new(), CustomerId::new());
        cancelled.cancel().unwrap();

        let repo = InMemoryRegistrationRepository::with_registrations([active.clone(), cancelled]);

        let enrolled = repo.find_enrolled_by_cycle_id(&cycle_id).await.unwrap();
        assert_eq!(enrolled.len(), 1);
        assert_eq!(enrolled[0].id(), active.id());
    }

    #[tokio::test]
    async fn update_all_requires_existing_records() {
        let repo = InMemoryRegistrationRepository::new();
        let reg = Registration::new(CycleId::new(), StudentId::new(), CustomerId::new());

        let err = repo.update_all(&[reg]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RegistrationNotFound);
    }
}
