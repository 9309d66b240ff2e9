//! PostgreSQL implementation of CycleRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{CycleId, DomainError, ErrorCode, InstructorId, Timestamp};
use crate::ports::CycleRepository;

use super::conversions::{
    activity_type_to_str, cycle_status_to_str, index_to_weekday, pricing_mode_to_str,
    str_to_activity_type, str_to_cycle_status, str_to_pricing_mode, weekday_to_index,
};

/// PostgreSQL implementation of CycleRepository.
#[derive(Clone)]
pub struct PostgresCycleRepository {
    pool: PgPool,
}

impl PostgresCycleRepository {
    /// Creates a new PostgresCycleRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CYCLE_COLUMNS: &str = r#"
    id, name, weekday, start_time, end_time, duration_minutes,
    start_date, end_date, total_meetings, completed_meetings,
    remaining_meetings, pricing_mode, activity_type, status,
    primary_instructor_id, instructor_budget, created_at, updated_at
"#;

#[async_trait]
impl CycleRepository for PostgresCycleRepository {
    async fn save(&self, cycle: &Cycle) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        insert_cycle(&mut tx, cycle).await?;

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit transaction: {}", e),
            )
        })
    }

    async fn update(&self, cycle: &Cycle) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        update_cycle(&mut tx, cycle).await?;

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit transaction: {}", e),
            )
        })
    }

    async fn find_by_id(&self, id: &CycleId) -> Result<Option<Cycle>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM cycles WHERE id = $1",
            CYCLE_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch cycle: {}", e))
        })?;

        row.map(row_to_cycle).transpose()
    }

    async fn exists(&self, id: &CycleId) -> Result<bool, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cycles WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to check cycle existence: {}", e),
                )
            })?;

        Ok(result.0 > 0)
    }
}

pub(crate) async fn insert_cycle(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    cycle: &Cycle,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO cycles (
            id, name, weekday, start_time, end_time, duration_minutes,
            start_date, end_date, total_meetings, completed_meetings,
            remaining_meetings, pricing_mode, activity_type, status,
            primary_instructor_id, instructor_budget, created_at, updated_at
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
            $11, $12, $13, $14, $15, $16, $17, $18
        )
        "#,
    )
    .bind(cycle.id().as_uuid())
    .bind(cycle.name())
    .bind(weekday_to_index(cycle.weekday()))
    .bind(cycle.start_time())
    .bind(cycle.end_time())
    .bind(cycle.duration_minutes() as i32)
    .bind(cycle.start_date())
    .bind(cycle.end_date())
    .bind(cycle.total_meetings() as i32)
    .bind(cycle.completed_meetings() as i32)
    .bind(cycle.remaining_meetings() as i32)
    .bind(pricing_mode_to_str(cycle.pricing_mode()))
    .bind(activity_type_to_str(cycle.activity_type()))
    .bind(cycle_status_to_str(cycle.status()))
    .bind(cycle.primary_instructor_id().map(|id| *id.as_uuid()))
    .bind(cycle.instructor_budget())
    .bind(cycle.created_at().as_datetime())
    .bind(cycle.updated_at().as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to insert cycle: {}", e))
    })?;

    Ok(())
}

pub(crate) async fn update_cycle(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    cycle: &Cycle,
) -> Result<(), DomainError> {
    let result = sqlx::query(
        r#"
        UPDATE cycles SET
            name = $2,
            end_date = $3,
            total_meetings = $4,
            completed_meetings = $5,
            remaining_meetings = $6,
            status = $7,
            updated_at = $8
        WHERE id = $1
        "#,
    )
    .bind(cycle.id().as_uuid())
    .bind(cycle.name())
    .bind(cycle.end_date())
    .bind(cycle.total_meetings() as i32)
    .bind(cycle.completed_meetings() as i32)
    .bind(cycle.remaining_meetings() as i32)
    .bind(cycle_status_to_str(cycle.status()))
    .bind(cycle.updated_at().as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to update cycle: {}", e))
    })?;

    if result.rows_affected() == 0 {
        return Err(DomainError::new(
            ErrorCode::CycleNotFound,
            format!("Cycle not found: {}", cycle.id()),
        ));
    }

    Ok(())
}

pub(crate) fn row_to_cycle(row: sqlx::postgres::PgRow) -> Result<Cycle, DomainError> {
    let id: Uuid = row.get("id");
    let name: String = row.get("name");
    let weekday: i16 = row.get("weekday");
    let start_time: chrono::NaiveTime = row.get("start_time");
    let end_time: chrono::NaiveTime = row.get("end_time");
    let duration_minutes: i32 = row.get("duration_minutes");
    let start_date: chrono::NaiveDate = row.get("start_date");
    let end_date: Option<chrono::NaiveDate> = row.get("end_date");
    let total_meetings: i32 = row.get("total_meetings");
    let completed_meetings: i32 = row.get("completed_meetings");
    let remaining_meetings: i32 = row.get("remaining_meetings");
    let pricing_mode: String = row.get("pricing_mode");
    let activity_type: String = row.get("activity_type");
    let status: String = row.get("status");
    let primary_instructor_id: Option<Uuid> = row.get("primary_instructor_id");
    let instructor_budget: Option<i64> = row.get("instructor_budget");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Ok(Cycle::reconstitute(
        CycleId::from_uuid(id),
        name,
        index_to_weekday(weekday)?,
        start_time,
        end_time,
        duration_minutes as u32,
        start_date,
        end_date,
        total_meetings as u32,
        completed_meetings as u32,
        remaining_meetings as u32,
        str_to_pricing_mode(&pricing_mode)?,
        str_to_activity_type(&activity_type)?,
        str_to_cycle_status(&status)?,
        primary_instructor_id.map(InstructorId::from_uuid),
        instructor_budget,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
