//! PostgreSQL unit-of-work adapters.
//!
//! Groups the multi-aggregate writes of the completion cascade and of
//! cycle duplication into single database transactions, so partial
//! application is never observable to other readers.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::registration::{Registration, UpsellLead};
use crate::ports::{CompletionUnitOfWork, DuplicationUnitOfWork};

use super::cycle_repository::{insert_cycle, update_cycle};
use super::registration_repository::{insert_registration, update_registration};
use super::upsell_lead_repository::insert_lead;

/// PostgreSQL implementation of the unit-of-work ports.
#[derive(Clone)]
pub struct PostgresUnitOfWork {
    pool: PgPool,
}

impl PostgresUnitOfWork {
    /// Creates a new PostgresUnitOfWork.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<sqlx::Transaction<'_, sqlx::Postgres>, DomainError> {
        self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })
    }
}

#[async_trait]
impl CompletionUnitOfWork for PostgresUnitOfWork {
    async fn commit_completion(
        &self,
        cycle: &Cycle,
        registrations: &[Registration],
        leads: &[UpsellLead],
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;

        update_cycle(&mut tx, cycle).await?;
        for registration in registrations {
            update_registration(&mut tx, registration).await?;
        }
        for lead in leads {
            insert_lead(&mut tx, lead).await?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit completion cascade: {}", e),
            )
        })
    }
}

#[async_trait]
impl DuplicationUnitOfWork for PostgresUnitOfWork {
    async fn commit_duplication(
        &self,
        cycle: &Cycle,
        registrations: &[Registration],
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;

        insert_cycle(&mut tx, cycle).await?;
        for registration in registrations {
            insert_registration(&mut tx, registration).await?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit duplication: {}", e),
            )
        })
    }
}
