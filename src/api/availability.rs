use axum::Json;
use axum::extract::State;

use crate::api::extract::AppQuery;
use crate::error::AppError;
use crate::scheduling::interval::parse_weekday;
use crate::scheduling::{DayKey, Interval};
use crate::services::{AvailabilityQuery, AvailabilityService, AvailableResource};
use crate::state::AppState;

pub async fn find_available(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AvailabilityQuery>,
) -> Result<Json<Vec<AvailableResource>>, AppError> {
    let day = match (query.date, query.weekday.as_deref()) {
        (Some(date), None) => DayKey::Date(date),
        (None, Some(weekday)) => DayKey::Weekday(parse_weekday(weekday)?),
        _ => return Err(AppError::validation("Provide exactly one of date or weekday")),
    };
    let candidate = Interval::parse(day, &query.start, &query.end)?;

    let service = AvailabilityService::new(state.db.clone());
    Ok(Json(service.find_available_resources(&candidate, query.kind).await?))
}
