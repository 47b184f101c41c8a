//! HTTP API route definitions.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_todo, delete_todo, health, list_todos, live, ready, render_metrics, update_todo, AppState,
};
use super::middleware::track_request_duration;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let metrics = Arc::clone(&state.metrics);

    Router::new()
        // Health checks
        .route("/health", get(health))
        .route("/live", get(live))
        .route("/ready", get(ready))
        .route("/metrics", get(render_metrics))
        // Todos
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/:id", put(update_todo).delete(delete_todo))
        .layer(middleware::from_fn_with_state(metrics, track_request_duration))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
