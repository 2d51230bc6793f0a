mod availability;
mod exams;
mod extract;
mod resources;
mod schedules;
mod timetables;

use axum::routing::{get, post, put};
use axum::{Router, extract::State, http::StatusCode};

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/classrooms", get(resources::list_classrooms).post(resources::create_classroom))
        .route(
            "/api/classrooms/{id}",
            get(resources::get_classroom)
                .put(resources::update_classroom)
                .delete(resources::delete_classroom),
        )
        .route("/api/faculty", get(resources::list_faculty).post(resources::create_faculty))
        .route(
            "/api/faculty/{id}",
            get(resources::get_faculty)
                .put(resources::update_faculty)
                .delete(resources::delete_faculty),
        )
        .route("/api/courses", get(resources::list_courses).post(resources::create_course))
        .route(
            "/api/courses/{id}",
            get(resources::get_course)
                .put(resources::update_course)
                .delete(resources::delete_course),
        )
        .route("/api/modules", get(resources::list_modules).post(resources::create_module))
        .route(
            "/api/modules/{id}",
            get(resources::get_module)
                .put(resources::update_module)
                .delete(resources::delete_module),
        )
        .route("/api/schedules", get(schedules::list_schedules).post(schedules::create_schedule))
        .route("/api/schedules/timetable", get(schedules::schedule_overview))
        .route("/api/schedules/generate", post(schedules::generate_allocations))
        .route(
            "/api/schedules/{id}",
            get(schedules::get_schedule)
                .put(schedules::update_schedule)
                .delete(schedules::delete_schedule),
        )
        .route("/api/exams", get(exams::list_exams).post(exams::create_exam))
        .route("/api/exams/available-classrooms", get(exams::available_classrooms))
        .route(
            "/api/exams/{id}",
            get(exams::get_exam).put(exams::update_exam).delete(exams::delete_exam),
        )
        .route("/api/availability", get(availability::find_available))
        .route("/api/timetable", get(timetables::list_timetables))
        .route("/api/timetable/generate", post(timetables::create_timetable))
        .route("/api/timetable/names", get(timetables::timetable_names))
        .route("/api/timetable/{title}", get(timetables::get_timetable))
        .route("/api/timetable/{title}/entries", post(timetables::add_entry))
        .route(
            "/api/timetable/{title}/entries/{entry_id}",
            put(timetables::update_entry).delete(timetables::delete_entry),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
