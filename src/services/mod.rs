pub mod allocation;
pub mod availability;
pub mod booking;
pub mod timetable;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::db::{ExamRepository, ScheduleRepository};
use crate::scheduling::ResourceLocks;

pub use allocation::propose_allocations;
pub use availability::{AvailabilityQuery, AvailabilityService, AvailableResource};
pub use booking::BookingService;
pub use timetable::TimetableService;

pub type ScheduleService = BookingService<ScheduleRepository>;
pub type ExamService = BookingService<ExamRepository>;

pub fn schedule_service(db: SqlitePool, locks: Arc<ResourceLocks>) -> ScheduleService {
    BookingService::new(ScheduleRepository::new(db), locks)
}

pub fn exam_service(db: SqlitePool, locks: Arc<ResourceLocks>) -> ExamService {
    BookingService::new(ExamRepository::new(db), locks)
}
