pub mod bookings;
pub mod classrooms;
pub mod courses;
pub mod exams;
pub mod faculty;
pub mod modules;
pub mod schedules;
pub mod timetables;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::config::AppConfig;

pub use bookings::BookingRepository;
pub use exams::ExamRepository;
pub use schedules::ScheduleRepository;
pub use timetables::TimetableEntryRepository;

pub async fn connect(config: &AppConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(db: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(db).await?;
    Ok(())
}

/// Tables whose rows can be referenced by a booking or a module.
#[derive(Debug, Clone, Copy)]
pub enum Table {
    Classrooms,
    Courses,
    Faculty,
    Modules,
}

impl Table {
    fn name(self) -> &'static str {
        match self {
            Table::Classrooms => "classrooms",
            Table::Courses => "courses",
            Table::Faculty => "faculty",
            Table::Modules => "modules",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Table::Classrooms => "Classroom",
            Table::Courses => "Course",
            Table::Faculty => "Faculty member",
            Table::Modules => "Module",
        }
    }
}

pub async fn exists(db: &SqlitePool, table: Table, id: &str) -> Result<bool, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?1", table.name());
    let found: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(db).await?;
    Ok(found > 0)
}

/// Fails with a validation error naming the first reference that does not resolve.
pub async fn ensure_references(
    db: &SqlitePool,
    refs: &[(Table, &str)],
) -> Result<(), crate::error::AppError> {
    for (table, id) in refs {
        if !exists(db, *table, id).await? {
            return Err(crate::error::AppError::validation(format!(
                "{} '{}' does not exist",
                table.label(),
                id
            )));
        }
    }
    Ok(())
}
