//! Routes and middleware.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::status))
        .route("/calculate", get(handlers::calculate))
        .route("/calculate_report", get(handlers::calculate_report))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
