use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{Table, ensure_references};
use crate::error::AppError;
use crate::models::{Module, ModuleRequest};

pub async fn fetch_modules(db: &SqlitePool) -> Result<Vec<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(
        "SELECT id, title, description, course_id, faculty_id FROM modules ORDER BY title"
    )
    .fetch_all(db)
    .await
}

pub async fn find_module_by_id(db: &SqlitePool, id: &str) -> Result<Option<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(
        "SELECT id, title, description, course_id, faculty_id FROM modules WHERE id = ?"
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_module(db: &SqlitePool, req: ModuleRequest) -> Result<Module, AppError> {
    ensure_references(
        db,
        &[(Table::Courses, req.course_id.as_str()), (Table::Faculty, req.faculty_id.as_str())],
    )
    .await?;

    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO modules (id, title, description, course_id, faculty_id)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.course_id)
    .bind(&req.faculty_id)
    .execute(db)
    .await?;

    Ok(Module {
        id,
        title: req.title,
        description: req.description,
        course_id: req.course_id,
        faculty_id: req.faculty_id,
    })
}

pub async fn update_module(
    db: &SqlitePool,
    id: &str,
    req: ModuleRequest,
) -> Result<Option<Module>, AppError> {
    ensure_references(
        db,
        &[(Table::Courses, req.course_id.as_str()), (Table::Faculty, req.faculty_id.as_str())],
    )
    .await?;

    let updated = sqlx::query(
        r#"
        UPDATE modules
        SET title = ?1,
            description = ?2,
            course_id = ?3,
            faculty_id = ?4
        WHERE id = ?5
        "#,
    )
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.course_id)
    .bind(&req.faculty_id)
    .bind(id)
    .execute(db)
    .await?
    .rows_affected();

    if updated == 0 {
        return Ok(None);
    }

    Ok(Some(Module {
        id: id.to_string(),
        title: req.title,
        description: req.description,
        course_id: req.course_id,
        faculty_id: req.faculty_id,
    }))
}

pub async fn delete_module(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM modules WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
