//! HTTP surface of the kiosk backend.

pub mod routes;
pub mod state;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::navigation::router())
        .merge(routes::calendar::router())
        .merge(routes::meta::router())
        .fallback(routes::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(routes::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
