use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{BookingRepository, Table, ensure_references};
use crate::error::AppError;
use crate::models::schedule::ScheduleRow;
use crate::models::{Schedule, ScheduleDraft, ScheduleOverview};
use crate::scheduling::{Booked, Interval, ResourceClaim, ResourceKind};

const COLUMNS: &str = "id, faculty_id, module_id, classroom_id, start_time, end_time, created_at";

const WITH_NAMES: &str = r#"
    SELECT s.id, s.faculty_id, s.module_id, s.classroom_id, s.start_time, s.end_time, s.created_at,
           m.title AS module_title, c.room_number AS room_number, f.name AS faculty_name
    FROM schedules s
    LEFT JOIN modules m ON m.id = s.module_id
    LEFT JOIN classrooms c ON c.id = s.classroom_id
    LEFT JOIN faculty f ON f.id = s.faculty_id
"#;

#[derive(Clone)]
pub struct ScheduleRepository {
    db: SqlitePool,
}

impl ScheduleRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Schedules touching `date`, including ones carried over from the previous evening.
    pub async fn list_on_date(&self, date: NaiveDate) -> Result<Vec<Schedule>, AppError> {
        let day = Interval::whole_day(date);
        let schedules = self.list().await?;
        Ok(schedules
            .into_iter()
            .filter(|s| s.interval().overlaps(&day))
            .collect())
    }
}

fn into_schedules(rows: Vec<ScheduleRow>) -> Result<Vec<Schedule>, AppError> {
    rows.into_iter()
        .map(|row| Schedule::try_from(row).map_err(AppError::from))
        .collect()
}

#[async_trait]
impl BookingRepository for ScheduleRepository {
    type Booking = Schedule;
    type Draft = ScheduleDraft;
    const KIND: &'static str = "Schedule";

    async fn list(&self) -> Result<Vec<Schedule>, AppError> {
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            "{WITH_NAMES} ORDER BY s.start_time"
        ))
        .fetch_all(&self.db)
        .await?;
        into_schedules(rows)
    }

    async fn find(&self, id: &str) -> Result<Option<Schedule>, AppError> {
        let row = sqlx::query_as::<_, ScheduleRow>(&format!(
            "{WITH_NAMES} WHERE s.id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        row.map(|r| Schedule::try_from(r).map_err(AppError::from)).transpose()
    }

    async fn list_by_resource(
        &self,
        claim: &ResourceClaim,
        exclude: Option<&str>,
    ) -> Result<Vec<Schedule>, AppError> {
        let column = match claim.kind {
            ResourceKind::Classroom => "classroom_id",
            ResourceKind::Faculty => "faculty_id",
        };
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            "SELECT {COLUMNS} FROM schedules WHERE {column} = ?1 AND (?2 IS NULL OR id != ?2) ORDER BY rowid"
        ))
        .bind(&claim.id)
        .bind(exclude)
        .fetch_all(&self.db)
        .await?;
        into_schedules(rows)
    }

    async fn insert(&self, draft: ScheduleDraft) -> Result<Schedule, AppError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO schedules
                (id, faculty_id, module_id, classroom_id, start_time, end_time, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(&draft.faculty_id)
        .bind(&draft.module_id)
        .bind(&draft.classroom_id)
        .bind(draft.start_time)
        .bind(draft.end_time)
        .bind(now)
        .execute(&self.db)
        .await?;

        self.find(&id).await?.ok_or_else(|| AppError::not_found(Self::KIND))
    }

    async fn update(&self, id: &str, draft: ScheduleDraft) -> Result<Option<Schedule>, AppError> {
        let updated = sqlx::query(
            r#"
            UPDATE schedules
            SET faculty_id = ?1,
                module_id = ?2,
                classroom_id = ?3,
                start_time = ?4,
                end_time = ?5
            WHERE id = ?6
            "#,
        )
        .bind(&draft.faculty_id)
        .bind(&draft.module_id)
        .bind(&draft.classroom_id)
        .bind(draft.start_time)
        .bind(draft.end_time)
        .bind(id)
        .execute(&self.db)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(None);
        }
        self.find(id).await
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();
        Ok(result > 0)
    }

    async fn exists(&self, id: &str) -> Result<bool, AppError> {
        let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schedules WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        Ok(found > 0)
    }

    async fn check_references(&self, draft: &ScheduleDraft) -> Result<(), AppError> {
        ensure_references(
            &self.db,
            &[
                (Table::Faculty, draft.faculty_id.as_str()),
                (Table::Modules, draft.module_id.as_str()),
                (Table::Classrooms, draft.classroom_id.as_str()),
            ],
        )
        .await
    }
}

/// Schedules joined with the names a printed timetable shows.
pub async fn fetch_overview(db: &SqlitePool) -> Result<Vec<ScheduleOverview>, sqlx::Error> {
    sqlx::query_as::<_, ScheduleOverview>(
        r#"
        SELECT
            f.name AS faculty_name,
            m.title AS module_name,
            c.room_number AS room_number,
            c.capacity AS student_count,
            s.start_time AS start_time,
            s.end_time AS end_time
        FROM schedules s
        JOIN faculty f ON f.id = s.faculty_id
        JOIN modules m ON m.id = s.module_id
        JOIN classrooms c ON c.id = s.classroom_id
        ORDER BY s.start_time
        "#,
    )
    .fetch_all(db)
    .await
}
