use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Faculty, FacultyRequest};

const DUPLICATE: &str = "A faculty member with this email already exists";

pub async fn fetch_faculty(db: &SqlitePool) -> Result<Vec<Faculty>, sqlx::Error> {
    sqlx::query_as::<_, Faculty>(
        "SELECT id, name, email, department, designation, is_available FROM faculty ORDER BY name"
    )
    .fetch_all(db)
    .await
}

pub async fn find_faculty_by_id(db: &SqlitePool, id: &str) -> Result<Option<Faculty>, sqlx::Error> {
    sqlx::query_as::<_, Faculty>(
        "SELECT id, name, email, department, designation, is_available FROM faculty WHERE id = ?"
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_faculty(db: &SqlitePool, req: FacultyRequest) -> Result<Faculty, AppError> {
    let id = Uuid::new_v4().to_string();
    let is_available = req.is_available.unwrap_or(true);

    sqlx::query(
        r#"
        INSERT INTO faculty (id, name, email, department, designation, is_available)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(&req.department)
    .bind(&req.designation)
    .bind(is_available)
    .execute(db)
    .await
    .map_err(|e| AppError::unique(e, DUPLICATE))?;

    Ok(Faculty {
        id,
        name: req.name,
        email: req.email,
        department: req.department,
        designation: req.designation,
        is_available,
    })
}

pub async fn update_faculty(
    db: &SqlitePool,
    id: &str,
    req: FacultyRequest,
) -> Result<Option<Faculty>, AppError> {
    let mut current = match find_faculty_by_id(db, id).await? {
        Some(f) => f,
        None => return Ok(None),
    };

    current.name = req.name;
    current.email = req.email;
    current.department = req.department;
    current.designation = req.designation;
    if let Some(is_available) = req.is_available {
        current.is_available = is_available;
    }

    sqlx::query(
        r#"
        UPDATE faculty
        SET name = ?1,
            email = ?2,
            department = ?3,
            designation = ?4,
            is_available = ?5
        WHERE id = ?6
        "#,
    )
    .bind(&current.name)
    .bind(&current.email)
    .bind(&current.department)
    .bind(&current.designation)
    .bind(current.is_available)
    .bind(id)
    .execute(db)
    .await
    .map_err(|e| AppError::unique(e, DUPLICATE))?;

    Ok(Some(current))
}

pub async fn delete_faculty(db: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM faculty WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| AppError::in_use(e, "Faculty member still teaches modules"))?
        .rows_affected();

    Ok(result > 0)
}
