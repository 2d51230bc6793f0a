use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::required;
use crate::scheduling::interval::format_hhmm;
use crate::scheduling::{Booked, Candidate, DayKey, Interval, ResourceClaim, ResourceKind};

#[derive(Debug, Clone, Serialize)]
pub struct ExamSchedule {
    pub id: String,
    pub module_id: String,
    pub course_id: String,
    pub faculty_id: String,
    pub classroom_id: String,
    pub exam_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    interval: Interval,
}

#[derive(Debug, FromRow)]
pub struct ExamRow {
    pub id: String,
    pub module_id: String,
    pub course_id: String,
    pub faculty_id: String,
    pub classroom_id: String,
    pub exam_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ExamRow> for ExamSchedule {
    type Error = sqlx::Error;

    fn try_from(row: ExamRow) -> Result<Self, Self::Error> {
        let interval = Interval::parse(DayKey::Date(row.exam_date), &row.start_time, &row.end_time)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Self {
            id: row.id,
            module_id: row.module_id,
            course_id: row.course_id,
            faculty_id: row.faculty_id,
            classroom_id: row.classroom_id,
            exam_date: row.exam_date,
            start_time: row.start_time,
            end_time: row.end_time,
            duration: row.duration,
            created_at: row.created_at,
            interval,
        })
    }
}

impl ExamSchedule {
    pub fn from_draft(id: String, draft: ExamDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            start_time: format_hhmm(draft.interval.start()),
            end_time: format_hhmm(draft.interval.end()),
            duration: draft.interval.duration_minutes(),
            module_id: draft.module_id,
            course_id: draft.course_id,
            faculty_id: draft.faculty_id,
            classroom_id: draft.classroom_id,
            exam_date: draft.exam_date,
            created_at,
            interval: draft.interval,
        }
    }
}

impl Booked for ExamSchedule {
    fn booking_id(&self) -> &str {
        &self.id
    }

    fn interval(&self) -> Interval {
        self.interval
    }

    /// Exams occupy the room only; the invigilating lecturer is payload.
    fn resource_id(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Classroom => Some(&self.classroom_id),
            ResourceKind::Faculty => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamRequest {
    pub module_id: Option<String>,
    pub course_id: Option<String>,
    pub faculty_id: Option<String>,
    pub classroom_id: Option<String>,
    /// `YYYY-MM-DD`
    pub exam_date: Option<String>,
    /// `HH:MM`, 24-hour
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ExamDraft {
    pub module_id: String,
    pub course_id: String,
    pub faculty_id: String,
    pub classroom_id: String,
    pub exam_date: NaiveDate,
    pub interval: Interval,
}

impl TryFrom<ExamRequest> for ExamDraft {
    type Error = AppError;

    fn try_from(req: ExamRequest) -> Result<Self, Self::Error> {
        let raw_date = required(req.exam_date, "exam_date")?;
        let exam_date = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d").map_err(|_| {
            AppError::validation(format!("Invalid exam_date '{raw_date}'. Use YYYY-MM-DD"))
        })?;
        let start_time = required(req.start_time, "start_time")?;
        let end_time = required(req.end_time, "end_time")?;
        let interval = Interval::parse(DayKey::Date(exam_date), &start_time, &end_time)?;

        // duration is derived; a caller-supplied value must agree with the range
        if let Some(duration) = req.duration {
            if duration != interval.duration_minutes() {
                return Err(AppError::validation(format!(
                    "Duration {} does not match {} to {} ({} minutes)",
                    duration,
                    start_time,
                    end_time,
                    interval.duration_minutes()
                )));
            }
        }

        Ok(Self {
            module_id: required(req.module_id, "module_id")?,
            course_id: required(req.course_id, "course_id")?,
            faculty_id: required(req.faculty_id, "faculty_id")?,
            classroom_id: required(req.classroom_id, "classroom_id")?,
            exam_date,
            interval,
        })
    }
}

impl Candidate for ExamDraft {
    fn interval(&self) -> &Interval {
        &self.interval
    }

    fn claims(&self) -> Vec<ResourceClaim> {
        vec![ResourceClaim::classroom(&self.classroom_id)]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailableClassroomsQuery {
    pub date: NaiveDate,
    pub start: String,
    pub end: String,
}
