//! PostgreSQL implementation of RegistrationRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::foundation::{
    CustomerId, CycleId, DomainError, ErrorCode, RegistrationId, StudentId, Timestamp,
};
use crate::domain::registration::Registration;
use crate::ports::RegistrationRepository;

use super::conversions::{registration_status_to_str, str_to_registration_status};

/// PostgreSQL implementation of RegistrationRepository.
#[derive(Clone)]
pub struct PostgresRegistrationRepository {
    pool: PgPool,
}

impl PostgresRegistrationRepository {
    /// Creates a new PostgresRegistrationRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const REGISTRATION_COLUMNS: &str =
    "id, cycle_id, student_id, customer_id, status, created_at, updated_at";

#[async_trait]
impl RegistrationRepository for PostgresRegistrationRepository {
    async fn save_all(&self, registrations: &[Registration]) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        for registration in registrations {
            insert_registration(&mut tx, registration).await?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit transaction: {}", e),
            )
        })
    }

    async fn update_all(&self, registrations: &[Registration]) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        for registration in registrations {
            update_registration(&mut tx, registration).await?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit transaction: {}", e),
            )
        })
    }

    async fn find_by_cycle_id(
        &self,
        cycle_id: &CycleId,
    ) -> Result<Vec<Registration>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM registrations WHERE cycle_id = $1",
            REGISTRATION_COLUMNS
        ))
        .bind(cycle_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch registrations: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_registration).collect()
    }

    async fn find_enrolled_by_cycle_id(
        &self,
        cycle_id: &CycleId,
    ) -> Result<Vec<Registration>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM registrations
            WHERE cycle_id = $1 AND status IN ('registered', 'active')
            "#,
            REGISTRATION_COLUMNS
        ))
        .bind(cycle_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch enrolled registrations: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_registration).collect()
    }
}

pub(crate) async fn insert_registration(
    tx: &mut Transaction<'_, Postgres>,
    registration: &Registration,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO registrations (
            id, cycle_id, student_id, customer_id, status, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(registration.id().as_uuid())
    .bind(registration.cycle_id().as_uuid())
    .bind(registration.student_id().as_uuid())
    .bind(registration.customer_id().as_uuid())
    .bind(registration_status_to_str(registration.status()))
    .bind(registration.created_at().as_datetime())
    .bind(registration.updated_at().as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to insert registration: {}", e),
        )
    })?;

    Ok(())
}

pub(crate) async fn update_registration(
    tx: &mut Transaction<'_, Postgres>,
    registration: &Registration,
) -> Result<(), DomainError> {
    let result = sqlx::query(
        r#"
        UPDATE registrations SET
            status = $2,
            updated_at = $3
        WHERE id = $1
        "#,
    )
    .bind(registration.id().as_uuid())
    .bind(registration_status_to_str(registration.status()))
    .bind(registration.updated_at().as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to update registration: {}", e),
        )
    })?;

    if result.rows_affected() == 0 {
        return Err(DomainError::new(
            ErrorCode::RegistrationNotFound,
            format!("Registration not found: {}", registration.id()),
        ));
    }

    Ok(())
}

fn row_to_registration(row: sqlx::postgres::PgRow) -> Result<Registration, DomainError> {
    let id: Uuid = row.get("id");
    let cycle_id: Uuid = row.get("cycle_id");
    let student_id: Uuid = row.get("student_id");
    let customer_id: Uuid = row.get("customer_id");
    let status: String = row.get("status");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Ok(Registration::reconstitute(
        RegistrationId::from_uuid(id),
        CycleId::from_uuid(cycle_id),
        StudentId::from_uuid(student_id),
        CustomerId::from_uuid(customer_id),
        str_to_registration_status(&status)?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
