use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::api::extract::AppJson;
use crate::error::AppError;
use crate::models::{NewTimetableRequest, Timetable, TimetableEntryRequest};
use crate::services::TimetableService;
use crate::state::AppState;

fn service(state: &AppState) -> TimetableService {
    TimetableService::new(state.db.clone(), state.locks.clone())
}

pub async fn list_timetables(State(state): State<AppState>) -> Result<Json<Vec<Timetable>>, AppError> {
    Ok(Json(service(&state).list().await?))
}

pub async fn timetable_names(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(service(&state).titles().await?))
}

pub async fn get_timetable(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<Timetable>, AppError> {
    Ok(Json(service(&state).get(&title).await?))
}

pub async fn create_timetable(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewTimetableRequest>,
) -> Result<(StatusCode, Json<Timetable>), AppError> {
    let timetable = service(&state).create_timetable(req).await?;
    Ok((StatusCode::CREATED, Json(timetable)))
}

pub async fn add_entry(
    State(state): State<AppState>,
    Path(title): Path<String>,
    AppJson(req): AppJson<TimetableEntryRequest>,
) -> Result<Json<Timetable>, AppError> {
    Ok(Json(service(&state).add_entry(&title, req).await?))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path((title, entry_id)): Path<(String, String)>,
    AppJson(req): AppJson<TimetableEntryRequest>,
) -> Result<Json<Timetable>, AppError> {
    Ok(Json(service(&state).update_entry(&title, &entry_id, req).await?))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path((title, entry_id)): Path<(String, String)>,
) -> Result<Json<Timetable>, AppError> {
    Ok(Json(service(&state).delete_entry(&title, &entry_id).await?))
}
