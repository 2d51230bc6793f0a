use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::{ExamRepository, ScheduleRepository, TimetableEntryRepository, classrooms, faculty};
use crate::error::AppError;
use crate::models::{Classroom, Faculty};
use crate::scheduling::{DayKey, Interval, ResourceKind, available_resources};

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AvailableResource {
    Classroom(Classroom),
    Faculty(Faculty),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub kind: ResourceKind,
    pub date: Option<chrono::NaiveDate>,
    pub weekday: Option<String>,
    pub start: String,
    pub end: String,
}

pub struct AvailabilityService {
    db: SqlitePool,
}

impl AvailabilityService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Resources of `kind` with no booking overlapping `candidate`.
    ///
    /// Dated candidates are checked against schedules and exams on that date,
    /// weekday candidates against timetable entries on that weekday.
    pub async fn find_available_resources(
        &self,
        candidate: &Interval,
        kind: ResourceKind,
    ) -> Result<Vec<AvailableResource>, AppError> {
        match kind {
            ResourceKind::Classroom => {
                let rooms = classrooms::fetch_classrooms(&self.db).await?;
                let free = self.filter_free(candidate, kind, rooms).await?;
                Ok(free.into_iter().map(AvailableResource::Classroom).collect())
            }
            ResourceKind::Faculty => {
                let staff = faculty::fetch_faculty(&self.db).await?;
                let free = self.filter_free(candidate, kind, staff).await?;
                Ok(free
                    .into_iter()
                    .filter(|f| f.is_available)
                    .map(AvailableResource::Faculty)
                    .collect())
            }
        }
    }

    pub async fn available_classrooms(&self, candidate: &Interval) -> Result<Vec<Classroom>, AppError> {
        let rooms = classrooms::fetch_classrooms(&self.db).await?;
        self.filter_free(candidate, ResourceKind::Classroom, rooms).await
    }

    async fn filter_free<R>(
        &self,
        candidate: &Interval,
        kind: ResourceKind,
        resources: Vec<R>,
    ) -> Result<Vec<R>, AppError>
    where
        R: crate::scheduling::Resource,
    {
        match candidate.day() {
            DayKey::Date(date) => {
                let schedules = ScheduleRepository::new(self.db.clone()).list_on_date(date).await?;
                let exams = ExamRepository::new(self.db.clone()).list_on_date(date).await?;
                let resources = available_resources(candidate, kind, resources, &schedules);
                Ok(available_resources(candidate, kind, resources, &exams))
            }
            DayKey::Weekday(day) => {
                let entries = TimetableEntryRepository::new(self.db.clone())
                    .list_on_weekday(day)
                    .await?;
                Ok(available_resources(candidate, kind, resources, &entries))
            }
        }
    }
}
