//! Liveness and info endpoints

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api", get(welcome))
        .route("/api/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "HSF Kiosk API is running" }))
}

async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to HSF Kiosk API" }))
}
