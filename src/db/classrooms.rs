use sqlx::SqlitePool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Classroom, ClassroomRequest};

const DUPLICATE: &str = "A classroom with this room number already exists";

pub async fn fetch_classrooms(db: &SqlitePool) -> Result<Vec<Classroom>, sqlx::Error> {
    sqlx::query_as::<_, Classroom>(
        "SELECT id, room_number, capacity, classroom_type, has_projector, additional_tools FROM classrooms ORDER BY room_number"
    )
    .fetch_all(db)
    .await
}

pub async fn find_classroom_by_id(db: &SqlitePool, id: &str) -> Result<Option<Classroom>, sqlx::Error> {
    sqlx::query_as::<_, Classroom>(
        "SELECT id, room_number, capacity, classroom_type, has_projector, additional_tools FROM classrooms WHERE id = ?"
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_classroom(db: &SqlitePool, req: ClassroomRequest) -> Result<Classroom, AppError> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO classrooms
            (id, room_number, capacity, classroom_type, has_projector, additional_tools)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&id)
    .bind(&req.room_number)
    .bind(req.capacity)
    .bind(req.classroom_type)
    .bind(req.has_projector)
    .bind(Json(req.additional_tools.clone()))
    .execute(db)
    .await
    .map_err(|e| AppError::unique(e, DUPLICATE))?;

    Ok(Classroom {
        id,
        room_number: req.room_number,
        capacity: req.capacity,
        classroom_type: req.classroom_type,
        has_projector: req.has_projector,
        additional_tools: Json(req.additional_tools),
    })
}

pub async fn update_classroom(
    db: &SqlitePool,
    id: &str,
    req: ClassroomRequest,
) -> Result<Option<Classroom>, AppError> {
    let updated = sqlx::query(
        r#"
        UPDATE classrooms
        SET room_number = ?1,
            capacity = ?2,
            classroom_type = ?3,
            has_projector = ?4,
            additional_tools = ?5
        WHERE id = ?6
        "#,
    )
    .bind(&req.room_number)
    .bind(req.capacity)
    .bind(req.classroom_type)
    .bind(req.has_projector)
    .bind(Json(req.additional_tools.clone()))
    .bind(id)
    .execute(db)
    .await
    .map_err(|e| AppError::unique(e, DUPLICATE))?
    .rows_affected();

    if updated == 0 {
        return Ok(None);
    }

    Ok(Some(Classroom {
        id: id.to_string(),
        room_number: req.room_number,
        capacity: req.capacity,
        classroom_type: req.classroom_type,
        has_projector: req.has_projector,
        additional_tools: Json(req.additional_tools),
    }))
}

pub async fn delete_classroom(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM classrooms WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
