//! Single-calendar endpoint

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::Utc;

use kiosk_core::calendar::EventDetail;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/calendar/{calendar_id}", get(calendar_events))
}

/// GET /api/calendar/:calendar_id - Upcoming events of the feed in `CALENDAR_<ID>`
async fn calendar_events(
    State(state): State<AppState>,
    Path(calendar_id): Path<String>,
) -> Result<Json<Vec<EventDetail>>, AppError> {
    let events = state
        .navigator()
        .calendars()
        .calendar_details(&calendar_id, Utc::now())
        .await
        .map_err(|e| AppError::exposed("Failed to fetch calendar", e))?
        .ok_or(AppError::NotFound("Calendar not configured"))?;

    Ok(Json(events))
}
