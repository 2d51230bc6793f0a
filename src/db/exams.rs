use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{BookingRepository, Table, ensure_references};
use crate::error::AppError;
use crate::models::exam::ExamRow;
use crate::models::{ExamDraft, ExamSchedule};
use crate::scheduling::interval::format_hhmm;
use crate::scheduling::{ResourceClaim, ResourceKind};

const COLUMNS: &str = "id, module_id, course_id, faculty_id, classroom_id, exam_date, start_time, end_time, duration, created_at";

#[derive(Clone)]
pub struct ExamRepository {
    db: SqlitePool,
}

impl ExamRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list_on_date(&self, date: NaiveDate) -> Result<Vec<ExamSchedule>, AppError> {
        let rows = sqlx::query_as::<_, ExamRow>(&format!(
            "SELECT {COLUMNS} FROM exam_schedules WHERE exam_date = ?1 ORDER BY rowid"
        ))
        .bind(date)
        .fetch_all(&self.db)
        .await?;
        into_exams(rows)
    }
}

fn into_exams(rows: Vec<ExamRow>) -> Result<Vec<ExamSchedule>, AppError> {
    rows.into_iter()
        .map(|row| ExamSchedule::try_from(row).map_err(AppError::from))
        .collect()
}

#[async_trait]
impl BookingRepository for ExamRepository {
    type Booking = ExamSchedule;
    type Draft = ExamDraft;
    const KIND: &'static str = "Exam schedule";

    async fn list(&self) -> Result<Vec<ExamSchedule>, AppError> {
        let rows = sqlx::query_as::<_, ExamRow>(&format!(
            "SELECT {COLUMNS} FROM exam_schedules ORDER BY exam_date, start_time"
        ))
        .fetch_all(&self.db)
        .await?;
        into_exams(rows)
    }

    async fn find(&self, id: &str) -> Result<Option<ExamSchedule>, AppError> {
        let row = sqlx::query_as::<_, ExamRow>(&format!(
            "SELECT {COLUMNS} FROM exam_schedules WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        row.map(|r| ExamSchedule::try_from(r).map_err(AppError::from)).transpose()
    }

    async fn list_by_resource(
        &self,
        claim: &ResourceClaim,
        exclude: Option<&str>,
    ) -> Result<Vec<ExamSchedule>, AppError> {
        // exams only ever hold a classroom
        if claim.kind != ResourceKind::Classroom {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, ExamRow>(&format!(
            "SELECT {COLUMNS} FROM exam_schedules WHERE classroom_id = ?1 AND (?2 IS NULL OR id != ?2) ORDER BY rowid"
        ))
        .bind(&claim.id)
        .bind(exclude)
        .fetch_all(&self.db)
        .await?;
        into_exams(rows)
    }

    async fn insert(&self, draft: ExamDraft) -> Result<ExamSchedule, AppError> {
        let id = Uuid::new_v4().to_string();
        let exam = ExamSchedule::from_draft(id, draft, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO exam_schedules
                (id, module_id, course_id, faculty_id, classroom_id,
                exam_date, start_time, end_time, duration, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&exam.id)
        .bind(&exam.module_id)
        .bind(&exam.course_id)
        .bind(&exam.faculty_id)
        .bind(&exam.classroom_id)
        .bind(exam.exam_date)
        .bind(&exam.start_time)
        .bind(&exam.end_time)
        .bind(exam.duration)
        .bind(exam.created_at)
        .execute(&self.db)
        .await?;

        Ok(exam)
    }

    async fn update(&self, id: &str, draft: ExamDraft) -> Result<Option<ExamSchedule>, AppError> {
        let updated = sqlx::query(
            r#"
            UPDATE exam_schedules
            SET module_id = ?1,
                course_id = ?2,
                faculty_id = ?3,
                classroom_id = ?4,
                exam_date = ?5,
                start_time = ?6,
                end_time = ?7,
                duration = ?8
            WHERE id = ?9
            "#,
        )
        .bind(&draft.module_id)
        .bind(&draft.course_id)
        .bind(&draft.faculty_id)
        .bind(&draft.classroom_id)
        .bind(draft.exam_date)
        .bind(format_hhmm(draft.interval.start()))
        .bind(format_hhmm(draft.interval.end()))
        .bind(draft.interval.duration_minutes())
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
        let result = sqlx::query("DELETE FROM exam_schedules WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();
        Ok(result > 0)
    }

    async fn exists(&self, id: &str) -> Result<bool, AppError> {
        let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exam_schedules WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        Ok(found > 0)
    }

    async fn check_references(&self, draft: &ExamDraft) -> Result<(), AppError> {
        ensure_references(
            &self.db,
            &[
                (Table::Modules, draft.module_id.as_str()),
                (Table::Courses, draft.course_id.as_str()),
                (Table::Faculty, draft.faculty_id.as_str()),
                (Table::Classrooms, draft.classroom_id.as_str()),
            ],
        )
        .await
    }
}
