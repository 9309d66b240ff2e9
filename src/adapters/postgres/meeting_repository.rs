//! PostgreSQL implementation of MeetingRepository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::foundation::{
    CycleId, DomainError, ErrorCode, InstructorId, MeetingId, Timestamp, UserId,
};
use crate::domain::meeting::Meeting;
use crate::ports::MeetingRepository;

use super::conversions::{
    activity_type_to_str, instructor_role_to_str, meeting_status_to_str, str_to_activity_type,
    str_to_instructor_role, str_to_meeting_status,
};

/// PostgreSQL implementation of MeetingRepository.
#[derive(Clone)]
pub struct PostgresMeetingRepository {
    pool: PgPool,
}

impl PostgresMeetingRepository {
    /// Creates a new PostgresMeetingRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MEETING_COLUMNS: &str = r#"
    id, cycle_id, meeting_date, start_time, end_time, status,
    instructor_id, instructor_role, activity_type, instructor_payment,
    revenue, profit, rescheduled_to, rescheduled_from, completed_at,
    completed_by, cancellation_reason, conference_resource_id,
    created_at, updated_at
"#;

#[async_trait]
impl MeetingRepository for PostgresMeetingRepository {
    async fn save(&self, meeting: &Meeting) -> Result<(), DomainError> {
        let mut tx = begin(&self.pool).await?;
        insert_meeting(&mut tx, meeting).await?;
        commit(tx).await
    }

    async fn save_all(&self, meetings: &[Meeting]) -> Result<(), DomainError> {
        let mut tx = begin(&self.pool).await?;
        for meeting in meetings {
            insert_meeting(&mut tx, meeting).await?;
        }
        commit(tx).await
    }

    async fn update(&self, meeting: &Meeting) -> Result<(), DomainError> {
        let mut tx = begin(&self.pool).await?;
        update_meeting(&mut tx, meeting).await?;
        commit(tx).await
    }

    async fn save_postponement(
        &self,
        original: &Meeting,
        successor: &Meeting,
    ) -> Result<(), DomainError> {
        let mut tx = begin(&self.pool).await?;
        update_meeting(&mut tx, original).await?;
        insert_meeting(&mut tx, successor).await?;
        commit(tx).await
    }

    async fn find_by_id(&self, id: &MeetingId) -> Result<Option<Meeting>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM meetings WHERE id = $1",
            MEETING_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch meeting: {}", e))
        })?;

        row.map(row_to_meeting).transpose()
    }

    async fn find_by_cycle_id(&self, cycle_id: &CycleId) -> Result<Vec<Meeting>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM meetings WHERE cycle_id = $1 ORDER BY meeting_date, start_time",
            MEETING_COLUMNS
        ))
        .bind(cycle_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch meetings: {}", e))
        })?;

        rows.into_iter().map(row_to_meeting).collect()
    }

    async fn latest_date_for_cycle(
        &self,
        cycle_id: &CycleId,
    ) -> Result<Option<NaiveDate>, DomainError> {
        let result: (Option<NaiveDate>,) =
            sqlx::query_as("SELECT MAX(meeting_date) FROM meetings WHERE cycle_id = $1")
                .bind(cycle_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to fetch latest meeting date: {}", e),
                    )
                })?;

        Ok(result.0)
    }

    async fn count_by_cycle_id(&self, cycle_id: &CycleId) -> Result<u32, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM meetings WHERE cycle_id = $1")
            .bind(cycle_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to count meetings: {}", e),
                )
            })?;

        Ok(result.0 as u32)
    }

    async fn count_completed_by_cycle_id(&self, cycle_id: &CycleId) -> Result<u32, DomainError> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM meetings WHERE cycle_id = $1 AND status = 'completed'",
        )
        .bind(cycle_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to count completed meetings: {}", e),
            )
        })?;

        Ok(result.0 as u32)
    }

    async fn find_scheduled_after(
        &self,
        cycle_id: &CycleId,
        after: NaiveDate,
    ) -> Result<Vec<Meeting>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM meetings
            WHERE cycle_id = $1 AND status = 'scheduled' AND meeting_date > $2
            ORDER BY meeting_date
            "#,
            MEETING_COLUMNS
        ))
        .bind(cycle_id.as_uuid())
        .bind(after)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch scheduled meetings: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_meeting).collect()
    }

    async fn delete(&self, id: &MeetingId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM meetings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete meeting: {}", e),
                )
            })?;

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════
// Helper Functions
// ════════════════════════════════════════════════════════════════════

async fn begin(pool: &PgPool) -> Result<Transaction<'_, Postgres>, DomainError> {
    pool.begin().await.map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to begin transaction: {}", e),
        )
    })
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), DomainError> {
    tx.commit().await.map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to commit transaction: {}", e),
        )
    })
}

async fn insert_meeting(
    tx: &mut Transaction<'_, Postgres>,
    meeting: &Meeting,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO meetings (
            id, cycle_id, meeting_date, start_time, end_time, status,
            instructor_id, instructor_role, activity_type, instructor_payment,
            revenue, profit, rescheduled_to, rescheduled_from, completed_at,
            completed_by, cancellation_reason, conference_resource_id,
            created_at, updated_at
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
            $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
        )
        "#,
    )
    .bind(meeting.id().as_uuid())
    .bind(meeting.cycle_id().as_uuid())
    .bind(meeting.date())
    .bind(meeting.start_time())
    .bind(meeting.end_time())
    .bind(meeting_status_to_str(meeting.status()))
    .bind(meeting.instructor_id().map(|id| *id.as_uuid()))
    .bind(instructor_role_to_str(meeting.instructor_role()))
    .bind(activity_type_to_str(meeting.activity_type()))
    .bind(meeting.instructor_payment())
    .bind(meeting.revenue())
    .bind(meeting.profit())
    .bind(meeting.rescheduled_to().map(|id| *id.as_uuid()))
    .bind(meeting.rescheduled_from().map(|id| *id.as_uuid()))
    .bind(meeting.completed_at().map(|ts| *ts.as_datetime()))
    .bind(meeting.completed_by().map(|u| u.as_str().to_string()))
    .bind(meeting.cancellation_reason())
    .bind(meeting.conference_resource_id())
    .bind(meeting.created_at().as_datetime())
    .bind(meeting.updated_at().as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to insert meeting: {}", e))
    })?;

    Ok(())
}

async fn update_meeting(
    tx: &mut Transaction<'_, Postgres>,
    meeting: &Meeting,
) -> Result<(), DomainError> {
    let result = sqlx::query(
        r#"
        UPDATE meetings SET
            meeting_date = $2,
            start_time = $3,
            end_time = $4,
            status = $5,
            instructor_id = $6,
            instructor_role = $7,
            instructor_payment = $8,
            revenue = $9,
            profit = $10,
            rescheduled_to = $11,
            rescheduled_from = $12,
            completed_at = $13,
            completed_by = $14,
            cancellation_reason = $15,
            conference_resource_id = $16,
            updated_at = $17
        WHERE id = $1
        "#,
    )
    .bind(meeting.id().as_uuid())
    .bind(meeting.date())
    .bind(meeting.start_time())
    .bind(meeting.end_time())
    .bind(meeting_status_to_str(meeting.status()))
    .bind(meeting.instructor_id().map(|id| *id.as_uuid()))
    .bind(instructor_role_to_str(meeting.instructor_role()))
    .bind(meeting.instructor_payment())
    .bind(meeting.revenue())
    .bind(meeting.profit())
    .bind(meeting.rescheduled_to().map(|id| *id.as_uuid()))
    .bind(meeting.rescheduled_from().map(|id| *id.as_uuid()))
    .bind(meeting.completed_at().map(|ts| *ts.as_datetime()))
    .bind(meeting.completed_by().map(|u| u.as_str().to_string()))
    .bind(meeting.cancellation_reason())
    .bind(meeting.conference_resource_id())
    .bind(meeting.updated_at().as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to update meeting: {}", e))
    })?;

    if result.rows_affected() == 0 {
        return Err(DomainError::new(
            ErrorCode::MeetingNotFound,
            format!("Meeting not found: {}", meeting.id()),
        ));
    }

    Ok(())
}

fn row_to_meeting(row: sqlx::postgres::PgRow) -> Result<Meeting, DomainError> {
    let id: Uuid = row.get("id");
    let cycle_id: Uuid = row.get("cycle_id");
    let date: NaiveDate = row.get("meeting_date");
    let start_time: chrono::NaiveTime = row.get("start_time");
    let end_time: chrono::NaiveTime = row.get("end_time");
    let status: String = row.get("status");
    let instructor_id: Option<Uuid> = row.get("instructor_id");
    let instructor_role: String = row.get("instructor_role");
    let activity_type: String = row.get("activity_type");
    let instructor_payment: Option<i64> = row.get("instructor_payment");
    let revenue: i64 = row.get("revenue");
    let profit: i64 = row.get("profit");
    let rescheduled_to: Option<Uuid> = row.get("rescheduled_to");
    let rescheduled_from: Option<Uuid> = row.get("rescheduled_from");
    let completed_at: Option<chrono::DateTime<chrono::Utc>> = row.get("completed_at");
    let completed_by: Option<String> = row.get("completed_by");
    let cancellation_reason: Option<String> = row.get("cancellation_reason");
    let conference_resource_id: Option<String> = row.get("conference_resource_id");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let completed_by = completed_by
        .map(UserId::new)
        .transpose()
        .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;

    Ok(Meeting::reconstitute(
        MeetingId::from_uuid(id),
        CycleId::from_uuid(cycle_id),
        date,
        start_time,
        end_time,
        str_to_meeting_status(&status)?,
        instructor_id.map(InstructorId::from_uuid),
        str_to_instructor_role(&instructor_role)?,
        str_to_activity_type(&activity_type)?,
        instructor_payment,
        revenue,
        profit,
        rescheduled_to.map(MeetingId::from_uuid),
        rescheduled_from.map(MeetingId::from_uuid),
        completed_at.map(Timestamp::from_datetime),
        completed_by,
        cancellation_reason,
        conference_resource_id,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
