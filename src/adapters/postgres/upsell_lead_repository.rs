//! PostgreSQL implementation of UpsellLeadRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::foundation::{
    CustomerId, CycleId, DomainError, ErrorCode, StudentId, Timestamp, UpsellLeadId,
};
use crate::domain::registration::UpsellLead;
use crate::ports::UpsellLeadRepository;

/// PostgreSQL implementation of UpsellLeadRepository.
#[derive(Clone)]
pub struct PostgresUpsellLeadRepository {
    pool: PgPool,
}

impl PostgresUpsellLeadRepository {
    /// Creates a new PostgresUpsellLeadRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UpsellLeadRepository for PostgresUpsellLeadRepository {
    async fn save_all(&self, leads: &[UpsellLead]) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        for lead in leads {
            insert_lead(&mut tx, lead).await?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit transaction: {}", e),
            )
        })
    }

    async fn find_by_source_cycle_id(
        &self,
        cycle_id: &CycleId,
    ) -> Result<Vec<UpsellLead>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, student_id, customer_id, course_name, source_cycle_id, created_at
            FROM upsell_leads
            WHERE source_cycle_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(cycle_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch leads: {}", e))
        })?;

        Ok(rows.into_iter().map(row_to_lead).collect())
    }
}

pub(crate) async fn insert_lead(
    tx: &mut Transaction<'_, Postgres>,
    lead: &UpsellLead,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO upsell_leads (
            id, student_id, customer_id, course_name, source_cycle_id, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(lead.id().as_uuid())
    .bind(lead.student_id().as_uuid())
    .bind(lead.customer_id().as_uuid())
    .bind(lead.course_name())
    .bind(lead.source_cycle_id().as_uuid())
    .bind(lead.created_at().as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to insert lead: {}", e))
    })?;

    Ok(())
}

fn row_to_lead(row: sqlx::postgres::PgRow) -> UpsellLead {
    let id: Uuid = row.get("id");
    let student_id: Uuid = row.get("student_id");
    let customer_id: Uuid = row.get("customer_id");
    let course_name: String = row.get("course_name");
    let source_cycle_id: Uuid = row.get("source_cycle_id");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    UpsellLead::reconstitute(
        UpsellLeadId::from_uuid(id),
        StudentId::from_uuid(student_id),
        CustomerId::from_uuid(customer_id),
        course_name,
        CycleId::from_uuid(source_cycle_id),
        Timestamp::from_datetime(created_at),
    )
}
