#![allow(dead_code)]

use std::sync::Arc;

use academic_scheduler::db::{self, classrooms, courses, faculty, modules};
use academic_scheduler::models::*;
use academic_scheduler::scheduling::ResourceLocks;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Fresh in-memory database with the real migrations applied.
pub async fn setup_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");
    db::migrate(&pool).await.expect("Failed to run migrations");
    pool
}

pub fn locks() -> Arc<ResourceLocks> {
    Arc::new(ResourceLocks::new())
}

pub fn at(raw: &str) -> DateTime<Utc> {
    raw.parse().expect("valid RFC 3339 timestamp")
}

pub async fn seed_classroom(db: &SqlitePool, room_number: &str, capacity: i64) -> Classroom {
    classrooms::insert_classroom(
        db,
        ClassroomRequest {
            room_number: room_number.to_string(),
            capacity,
            classroom_type: ClassroomType::LectureHall,
            has_projector: true,
            additional_tools: vec![ClassroomTool::Whiteboard],
        },
    )
    .await
    .expect("Failed to insert classroom")
}

pub async fn seed_faculty(db: &SqlitePool, name: &str) -> Faculty {
    faculty::insert_faculty(
        db,
        FacultyRequest {
            name: name.to_string(),
            email: format!("{}@uni.example", name.to_lowercase().replace(' ', ".")),
            department: "Computing".to_string(),
            designation: "Lecturer".to_string(),
            is_available: None,
        },
    )
    .await
    .expect("Failed to insert faculty")
}

/// A module with its own course and lecturer.
pub struct Fixture {
    pub room: Classroom,
    pub other_room: Classroom,
    pub lecturer: Faculty,
    pub other_lecturer: Faculty,
    pub course: Course,
    pub module: Module,
}

pub async fn seed(db: &SqlitePool) -> Fixture {
    let room = seed_classroom(db, "A101", 40).await;
    let other_room = seed_classroom(db, "B202", 120).await;
    let lecturer = seed_faculty(db, "Ada Lovelace").await;
    let other_lecturer = seed_faculty(db, "Alan Turing").await;
    let course = courses::insert_course(
        db,
        CourseRequest {
            name: "Computer Science".to_string(),
            description: None,
        },
    )
    .await
    .expect("Failed to insert course");
    let module = modules::insert_module(
        db,
        ModuleRequest {
            title: "Algorithms".to_string(),
            description: Some("Sorting and searching".to_string()),
            course_id: course.id.clone(),
            faculty_id: lecturer.id.clone(),
        },
    )
    .await
    .expect("Failed to insert module");

    Fixture {
        room,
        other_room,
        lecturer,
        other_lecturer,
        course,
        module,
    }
}

pub fn schedule_request(
    fx: &Fixture,
    room: &Classroom,
    lecturer: &Faculty,
    start: &str,
    end: &str,
) -> ScheduleRequest {
    ScheduleRequest {
        faculty_id: Some(lecturer.id.clone()),
        module_id: Some(fx.module.id.clone()),
        classroom_id: Some(room.id.clone()),
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
    }
}

pub fn exam_request(fx: &Fixture, room: &Classroom, date: &str, start: &str, end: &str) -> ExamRequest {
    ExamRequest {
        module_id: Some(fx.module.id.clone()),
        course_id: Some(fx.course.id.clone()),
        faculty_id: Some(fx.lecturer.id.clone()),
        classroom_id: Some(room.id.clone()),
        exam_date: Some(date.to_string()),
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
        duration: None,
    }
}

pub fn entry_request(fx: &Fixture, room: &Classroom, slot: &str) -> TimetableEntryRequest {
    TimetableEntryRequest {
        module_id: Some(fx.module.id.clone()),
        classroom_id: Some(room.id.clone()),
        faculty_id: Some(fx.lecturer.id.clone()),
        time_slot: slot.to_string(),
    }
}
