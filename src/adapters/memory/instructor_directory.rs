//! Static instructor directory for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, InstructorId};
use crate::domain::payment::RateTable;
use crate::ports::InstructorDirectory;

/// Instructor directory backed by a fixed in-memory table.
///
/// For tests only; production resolves rates from the staff system.
#[derive(Default)]
pub struct StaticInstructorDirectory {
    tables: Mutex<HashMap<InstructorId, RateTable>>,
}

impl StaticInstructorDirectory {
    /// Creates an empty directory (every lookup misses).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an instructor's rate table.
    pub fn insert(&self, instructor_id: InstructorId, rates: RateTable) {
        self.tables
            .lock()
            .expect("lock poisoned")
            .insert(instructor_id, rates);
    }
}

#[async_trait]
impl InstructorDirectory for StaticInstructorDirectory {
    async fn rate_table(
        &self,
        instructor_id: &InstructorId,
    ) -> Result<Option<RateTable>, DomainError> {
        Ok(self
            .tables
            .lock()
            .expect("lock poisoned")
            .get(instructor_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registered_instructor_is_found() {
        let directory = StaticInstructorDirectory::new();
        let id = InstructorId::new();
        directory.insert(id, RateTable::empty().with_frontal(120.0));

        let table = directory.rate_table(&id).await.unwrap().unwrap();
        assert_eq!(table.frontal, Some(120.0));
    }

    #[tokio::test]
    async fn unknown_instructor_returns_none() {
        let directory = StaticInstructorDirectory::new();
        let found = directory.rate_table(&InstructorId::new()).await.unwrap();
        assert!(found.is_none());
    }
}
