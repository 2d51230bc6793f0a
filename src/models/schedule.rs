use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::required;
use crate::scheduling::{Booked, Candidate, Interval, ResourceClaim, ResourceKind};

/// A classroom + faculty booking on absolute timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub id: String,
    pub faculty_id: String,
    pub module_id: String,
    pub classroom_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_name: Option<String>,
    #[serde(skip)]
    interval: Interval,
}

#[derive(Debug, FromRow)]
pub struct ScheduleRow {
    pub id: String,
    pub faculty_id: String,
    pub module_id: String,
    pub classroom_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    // filled only by the joined listing queries
    #[sqlx(default)]
    pub module_title: Option<String>,
    #[sqlx(default)]
    pub room_number: Option<String>,
    #[sqlx(default)]
    pub faculty_name: Option<String>,
}

impl TryFrom<ScheduleRow> for Schedule {
    type Error = sqlx::Error;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        let interval = Interval::from_timestamps(row.start_time, row.end_time)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Self {
            id: row.id,
            faculty_id: row.faculty_id,
            module_id: row.module_id,
            classroom_id: row.classroom_id,
            start_time: row.start_time,
            end_time: row.end_time,
            created_at: row.created_at,
            module_title: row.module_title,
            room_number: row.room_number,
            faculty_name: row.faculty_name,
            interval,
        })
    }
}

impl Booked for Schedule {
    fn booking_id(&self) -> &str {
        &self.id
    }

    fn interval(&self) -> Interval {
        self.interval
    }

    fn resource_id(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Classroom => Some(&self.classroom_id),
            ResourceKind::Faculty => Some(&self.faculty_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub faculty_id: Option<String>,
    pub module_id: Option<String>,
    pub classroom_id: Option<String>,
    /// RFC 3339 with any offset; stored as UTC.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// A validated schedule, ready for the conflict check.
#[derive(Debug, Clone)]
pub struct ScheduleDraft {
    pub faculty_id: String,
    pub module_id: String,
    pub classroom_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub interval: Interval,
}

impl TryFrom<ScheduleRequest> for ScheduleDraft {
    type Error = AppError;

    fn try_from(req: ScheduleRequest) -> Result<Self, Self::Error> {
        let start_time = timestamp(req.start_time, "start_time")?;
        let end_time = timestamp(req.end_time, "end_time")?;
        let interval = Interval::from_timestamps(start_time, end_time)?;
        Ok(Self {
            faculty_id: required(req.faculty_id, "faculty_id")?,
            module_id: required(req.module_id, "module_id")?,
            classroom_id: required(req.classroom_id, "classroom_id")?,
            start_time,
            end_time,
            interval,
        })
    }
}

fn timestamp(raw: Option<String>, field: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = required(raw, field)?;
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| {
            AppError::validation(format!(
                "Invalid {field} '{raw}'. Use an RFC 3339 timestamp, e.g. 2024-05-01T09:00:00Z"
            ))
        })
}

impl Candidate for ScheduleDraft {
    fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Faculty first, then classroom, so a double-booked lecturer is reported
    /// even when the room is also taken.
    fn claims(&self) -> Vec<ResourceClaim> {
        vec![
            ResourceClaim::faculty(&self.faculty_id),
            ResourceClaim::classroom(&self.classroom_id),
        ]
    }
}

/// One row of the joined schedule overview.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ScheduleOverview {
    pub faculty_name: String,
    pub module_name: String,
    pub room_number: String,
    pub student_count: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDemand {
    pub module_id: String,
    pub student_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub modules: Vec<ModuleDemand>,
    pub faculty_ids: Vec<String>,
}

/// A proposed module → room → lecturer pairing. Nothing is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub module_id: String,
    pub module_name: String,
    pub faculty_id: String,
    pub faculty_name: String,
    pub classroom_id: String,
    pub room_number: String,
    pub capacity: i64,
}
