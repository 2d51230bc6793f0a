use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::api::extract::AppJson;
use crate::db::{classrooms, courses, faculty, modules};
use crate::error::AppError;
use crate::models::{
    Classroom, ClassroomRequest, Course, CourseRequest, Faculty, FacultyRequest, Module, ModuleRequest,
};
use crate::state::AppState;

pub async fn list_classrooms(State(state): State<AppState>) -> Result<Json<Vec<Classroom>>, AppError> {
    Ok(Json(classrooms::fetch_classrooms(&state.db).await?))
}

pub async fn get_classroom(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Classroom>, AppError> {
    let classroom = classrooms::find_classroom_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Classroom"))?;
    Ok(Json(classroom))
}

pub async fn create_classroom(
    State(state): State<AppState>,
    AppJson(req): AppJson<ClassroomRequest>,
) -> Result<(StatusCode, Json<Classroom>), AppError> {
    req.validate()?;
    let classroom = classrooms::insert_classroom(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(classroom)))
}

pub async fn update_classroom(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<ClassroomRequest>,
) -> Result<Json<Classroom>, AppError> {
    req.validate()?;
    let classroom = classrooms::update_classroom(&state.db, &id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Classroom"))?;
    Ok(Json(classroom))
}

pub async fn delete_classroom(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if classrooms::delete_classroom(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Classroom"))
    }
}

pub async fn list_faculty(State(state): State<AppState>) -> Result<Json<Vec<Faculty>>, AppError> {
    Ok(Json(faculty::fetch_faculty(&state.db).await?))
}

pub async fn get_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Faculty>, AppError> {
    let member = faculty::find_faculty_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Faculty member"))?;
    Ok(Json(member))
}

pub async fn create_faculty(
    State(state): State<AppState>,
    AppJson(req): AppJson<FacultyRequest>,
) -> Result<(StatusCode, Json<Faculty>), AppError> {
    req.validate()?;
    let member = faculty::insert_faculty(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn update_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<FacultyRequest>,
) -> Result<Json<Faculty>, AppError> {
    req.validate()?;
    let member = faculty::update_faculty(&state.db, &id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Faculty member"))?;
    Ok(Json(member))
}

pub async fn delete_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if faculty::delete_faculty(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Faculty member"))
    }
}

pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    Ok(Json(courses::fetch_courses(&state.db).await?))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = courses::find_course_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Course"))?;
    Ok(Json(course))
}

pub async fn create_course(
    State(state): State<AppState>,
    AppJson(req): AppJson<CourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    req.validate()?;
    let course = courses::insert_course(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<CourseRequest>,
) -> Result<Json<Course>, AppError> {
    req.validate()?;
    let course = courses::update_course(&state.db, &id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Course"))?;
    Ok(Json(course))
}

pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if courses::delete_course(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Course"))
    }
}

pub async fn list_modules(State(state): State<AppState>) -> Result<Json<Vec<Module>>, AppError> {
    Ok(Json(modules::fetch_modules(&state.db).await?))
}

pub async fn get_module(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Module>, AppError> {
    let module = modules::find_module_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Module"))?;
    Ok(Json(module))
}

pub async fn create_module(
    State(state): State<AppState>,
    AppJson(req): AppJson<ModuleRequest>,
) -> Result<(StatusCode, Json<Module>), AppError> {
    req.validate()?;
    let module = modules::insert_module(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(module)))
}

pub async fn update_module(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<ModuleRequest>,
) -> Result<Json<Module>, AppError> {
    req.validate()?;
    let module = modules::update_module(&state.db, &id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Module"))?;
    Ok(Json(module))
}

pub async fn delete_module(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if modules::delete_module(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Module"))
    }
}
