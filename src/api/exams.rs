use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::api::extract::{AppJson, AppQuery};
use crate::error::AppError;
use crate::models::{AvailableClassroomsQuery, Classroom, ExamDraft, ExamRequest, ExamSchedule};
use crate::scheduling::{DayKey, Interval};
use crate::services::{AvailabilityService, exam_service};
use crate::state::AppState;

pub async fn list_exams(State(state): State<AppState>) -> Result<Json<Vec<ExamSchedule>>, AppError> {
    let service = exam_service(state.db.clone(), state.locks.clone());
    Ok(Json(service.list().await?))
}

pub async fn get_exam(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExamSchedule>, AppError> {
    let service = exam_service(state.db.clone(), state.locks.clone());
    Ok(Json(service.get(&id).await?))
}

pub async fn create_exam(
    State(state): State<AppState>,
    AppJson(req): AppJson<ExamRequest>,
) -> Result<(StatusCode, Json<ExamSchedule>), AppError> {
    let draft = ExamDraft::try_from(req)?;
    let service = exam_service(state.db.clone(), state.locks.clone());
    let exam = service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(exam)))
}

pub async fn update_exam(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<ExamRequest>,
) -> Result<Json<ExamSchedule>, AppError> {
    let draft = ExamDraft::try_from(req)?;
    let service = exam_service(state.db.clone(), state.locks.clone());
    Ok(Json(service.update(&id, draft).await?))
}

pub async fn delete_exam(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let service = exam_service(state.db.clone(), state.locks.clone());
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn available_classrooms(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AvailableClassroomsQuery>,
) -> Result<Json<Vec<Classroom>>, AppError> {
    let candidate = Interval::parse(DayKey::Date(query.date), &query.start, &query.end)?;
    let service = AvailabilityService::new(state.db.clone());
    Ok(Json(service.available_classrooms(&candidate).await?))
}
