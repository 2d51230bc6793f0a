use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::api::extract::AppJson;
use crate::db::schedules;
use crate::error::AppError;
use crate::models::{
    Allocation, AllocationRequest, Schedule, ScheduleDraft, ScheduleOverview, ScheduleRequest,
};
use crate::services::{propose_allocations, schedule_service};
use crate::state::AppState;

pub async fn list_schedules(State(state): State<AppState>) -> Result<Json<Vec<Schedule>>, AppError> {
    let service = schedule_service(state.db.clone(), state.locks.clone());
    Ok(Json(service.list().await?))
}

pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Schedule>, AppError> {
    let service = schedule_service(state.db.clone(), state.locks.clone());
    Ok(Json(service.get(&id).await?))
}

pub async fn create_schedule(
    State(state): State<AppState>,
    AppJson(req): AppJson<ScheduleRequest>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    let draft = ScheduleDraft::try_from(req)?;
    let service = schedule_service(state.db.clone(), state.locks.clone());
    let schedule = service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<ScheduleRequest>,
) -> Result<Json<Schedule>, AppError> {
    let draft = ScheduleDraft::try_from(req)?;
    let service = schedule_service(state.db.clone(), state.locks.clone());
    Ok(Json(service.update(&id, draft).await?))
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let service = schedule_service(state.db.clone(), state.locks.clone());
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn schedule_overview(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScheduleOverview>>, AppError> {
    Ok(Json(schedules::fetch_overview(&state.db).await?))
}

pub async fn generate_allocations(
    State(state): State<AppState>,
    AppJson(req): AppJson<AllocationRequest>,
) -> Result<Json<Vec<Allocation>>, AppError> {
    Ok(Json(propose_allocations(&state.db, req).await?))
}
