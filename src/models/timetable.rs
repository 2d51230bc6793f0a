use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::required;
use crate::scheduling::interval::{IntervalError, parse_hhmm, parse_weekday};
use crate::scheduling::{Booked, Candidate, Interval, ResourceClaim, ResourceKind, TimeSlot};

pub const MIN_TIMETABLE_ENTRIES: usize = 4;

#[derive(Debug, Clone, Serialize)]
pub struct Timetable {
    pub id: String,
    pub title: String,
    pub entries: Vec<TimetableEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct TimetableRow {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimetableRow {
    pub fn with_entries(self, entries: Vec<TimetableEntry>) -> Timetable {
        Timetable {
            id: self.id,
            title: self.title,
            entries,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// One weekly slot inside a named timetable. Conflicts are global across timetables.
#[derive(Debug, Clone, Serialize)]
pub struct TimetableEntry {
    pub id: String,
    pub timetable_id: String,
    pub module_id: String,
    pub classroom_id: String,
    pub faculty_id: String,
    pub time_slot: TimeSlot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_name: Option<String>,
}

#[derive(Debug, FromRow)]
pub struct TimetableEntryRow {
    pub id: String,
    pub timetable_id: String,
    pub module_id: String,
    pub classroom_id: String,
    pub faculty_id: String,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    #[sqlx(default)]
    pub module_title: Option<String>,
    #[sqlx(default)]
    pub room_number: Option<String>,
    #[sqlx(default)]
    pub faculty_name: Option<String>,
}

impl TryFrom<TimetableEntryRow> for TimetableEntry {
    type Error = sqlx::Error;

    fn try_from(row: TimetableEntryRow) -> Result<Self, Self::Error> {
        let decode = |e: IntervalError| sqlx::Error::Decode(Box::new(e));
        let time_slot = TimeSlot::new(
            parse_weekday(&row.day_of_week).map_err(decode)?,
            parse_hhmm(&row.start_time).map_err(decode)?,
            parse_hhmm(&row.end_time).map_err(decode)?,
        )
        .map_err(decode)?;

        Ok(Self {
            id: row.id,
            timetable_id: row.timetable_id,
            module_id: row.module_id,
            classroom_id: row.classroom_id,
            faculty_id: row.faculty_id,
            time_slot,
            module_title: row.module_title,
            room_number: row.room_number,
            faculty_name: row.faculty_name,
        })
    }
}

impl TimetableEntry {
    pub fn from_draft(id: String, draft: TimetableEntryDraft) -> Self {
        Self {
            id,
            timetable_id: draft.timetable_id,
            module_id: draft.module_id,
            classroom_id: draft.classroom_id,
            faculty_id: draft.faculty_id,
            time_slot: draft.time_slot,
            module_title: None,
            room_number: None,
            faculty_name: None,
        }
    }
}

impl Booked for TimetableEntry {
    fn booking_id(&self) -> &str {
        &self.id
    }

    fn interval(&self) -> Interval {
        *self.time_slot.interval()
    }

    fn resource_id(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Classroom => Some(&self.classroom_id),
            ResourceKind::Faculty => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableEntryRequest {
    pub module_id: Option<String>,
    pub classroom_id: Option<String>,
    pub faculty_id: Option<String>,
    pub time_slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTimetableRequest {
    pub title: String,
    pub entries: Vec<TimetableEntryRequest>,
}

#[derive(Debug, Clone)]
pub struct TimetableEntryDraft {
    pub timetable_id: String,
    pub module_id: String,
    pub classroom_id: String,
    pub faculty_id: String,
    pub time_slot: TimeSlot,
}

impl TimetableEntryDraft {
    pub fn new(timetable_id: &str, req: TimetableEntryRequest) -> Result<Self, AppError> {
        let time_slot: TimeSlot = req.time_slot.parse()?;
        Ok(Self {
            timetable_id: timetable_id.to_string(),
            module_id: required(req.module_id, "module_id")?,
            classroom_id: required(req.classroom_id, "classroom_id")?,
            faculty_id: required(req.faculty_id, "faculty_id")?,
            time_slot,
        })
    }
}

impl Candidate for TimetableEntryDraft {
    fn interval(&self) -> &Interval {
        self.time_slot.interval()
    }

    fn claims(&self) -> Vec<ResourceClaim> {
        vec![ResourceClaim::classroom(&self.classroom_id)]
    }
}
