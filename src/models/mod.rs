pub mod classroom;
pub mod course;
pub mod exam;
pub mod faculty;
pub mod module;
pub mod schedule;
pub mod timetable;

pub use classroom::{Classroom, ClassroomRequest, ClassroomTool, ClassroomType};
pub use course::{Course, CourseRequest};
pub use exam::{AvailableClassroomsQuery, ExamDraft, ExamRequest, ExamSchedule};
pub use faculty::{Faculty, FacultyRequest};
pub use module::{Module, ModuleRequest};
pub use schedule::{
    Allocation, AllocationRequest, ModuleDemand, Schedule, ScheduleDraft, ScheduleOverview,
    ScheduleRequest,
};
pub use timetable::{
    MIN_TIMETABLE_ENTRIES, NewTimetableRequest, Timetable, TimetableEntry, TimetableEntryDraft,
    TimetableEntryRequest,
};

use crate::error::AppError;

/// Missing or blank reference fields are a validation failure, not a deserialisation one.
pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::validation(format!("{field} is required"))),
    }
}
