use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Course, CourseRequest};

const DUPLICATE: &str = "A course with this name already exists";

pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>("SELECT id, name, description FROM courses ORDER BY name")
        .fetch_all(db)
        .await
}

pub async fn find_course_by_id(db: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>("SELECT id, name, description FROM courses WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_course(db: &SqlitePool, req: CourseRequest) -> Result<Course, AppError> {
    let id = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO courses (id, name, description) VALUES (?1, ?2, ?3)")
        .bind(&id)
        .bind(&req.name)
        .bind(&req.description)
        .execute(db)
        .await
        .map_err(|e| AppError::unique(e, DUPLICATE))?;

    Ok(Course {
        id,
        name: req.name,
        description: req.description,
    })
}

pub async fn update_course(
    db: &SqlitePool,
    id: &str,
    req: CourseRequest,
) -> Result<Option<Course>, AppError> {
    let updated = sqlx::query("UPDATE courses SET name = ?1, description = ?2 WHERE id = ?3")
        .bind(&req.name)
        .bind(&req.description)
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| AppError::unique(e, DUPLICATE))?
        .rows_affected();

    if updated == 0 {
        return Ok(None);
    }

    Ok(Some(Course {
        id: id.to_string(),
        name: req.name,
        description: req.description,
    }))
}

pub async fn delete_course(db: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| AppError::in_use(e, "Course is still referenced by modules"))?
        .rows_affected();

    Ok(result > 0)
}
