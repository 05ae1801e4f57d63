//! Navigation endpoints

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;

use kiosk_core::Navigation;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/navigation", get(navigation))
        // Name used by older kiosk front ends
        .route("/api/files", get(navigation))
}

#[derive(Deserialize)]
pub struct NavigationQuery {
    pub category: Option<String>,
}

/// GET /api/navigation?category= - Navigation entries, or the one matching `category`
async fn navigation(
    State(state): State<AppState>,
    query: Result<Query<NavigationQuery>, QueryRejection>,
) -> Result<Json<Navigation>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let category = query.category.as_deref().filter(|c| !c.is_empty());

    let navigation = state
        .navigator()
        .compose(category, Utc::now())
        .await
        .map_err(|e| AppError::exposed("Failed to load navigation", e))?;

    Ok(Json(navigation))
}
