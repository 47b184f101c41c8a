//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use tracing::{error, info, warn};

use crate::error::StoreError;
use crate::lifecycle::refresh_active_count;
use crate::metrics::Metrics;
use crate::store::{NewTodo, Todo, TodoId, TodoPatch, TodoStore};

use super::error::ApiError;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Todo storage gateway.
    pub store: Arc<dyn TodoStore>,
    /// Metrics registry.
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new app state.
    pub fn new(store: Arc<dyn TodoStore>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    /// Translate a store failure, counting it if the database was at fault.
    fn store_failure(&self, err: StoreError, action: &'static str) -> ApiError {
        match err {
            StoreError::InvalidId(_) => ApiError::InvalidId,
            StoreError::Storage { op, reason } => {
                self.metrics.inc_db_errors(op);
                error!(operation = %op, "Failed to {}: {}", action, reason);
                ApiError::Storage { action }
            }
        }
    }

    async fn refresh_active_count(&self) {
        refresh_active_count(self.store.as_ref(), &self.metrics).await;
    }
}

/// Static health check response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// "ok", "alive" or "ready".
    pub status: &'static str,
}

/// Confirmation message.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Todo as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    /// RFC 3339 creation time.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id.to_string(),
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            created_at: todo.created_at.format(&Rfc3339).unwrap_or_default(),
        }
    }
}

/// Create request body.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Accepted for compatibility; new todos always start incomplete.
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Update request body. Missing and null fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl From<UpdateTodoRequest> for TodoPatch {
    fn from(req: UpdateTodoRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            completed: req.completed,
        }
    }
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(StatusResponse { status: "ok" })
}

/// Liveness check - returns 200 while the process is serving.
pub async fn live() -> impl IntoResponse {
    Json(StatusResponse { status: "alive" })
}

/// Readiness check - returns 200 if the database answers a ping, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    match state.store.ping().await {
        Ok(()) => Ok(Json(StatusResponse { status: "ready" })),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            Err(ApiError::NotReady)
        }
    }
}

/// Prometheus metrics in text exposition format.
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.metrics.render(),
    )
}

/// List every todo.
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<TodoResponse>>, ApiError> {
    let todos = state
        .store
        .list_all()
        .await
        .map_err(|e| state.store_failure(e, "fetch todos"))?;

    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

/// Create a todo. `completed` in the body is ignored.
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    if req.title.is_empty() {
        return Err(ApiError::EmptyTitle);
    }

    let todo = state
        .store
        .insert(NewTodo {
            title: req.title,
            description: req.description,
        })
        .await
        .map_err(|e| state.store_failure(e, "create todo"))?;

    state.metrics.inc_todos_created();
    state.refresh_active_count().await;
    info!(id = %todo.id, "Todo created");

    Ok((StatusCode::CREATED, Json(TodoResponse::from(todo))))
}

/// Apply a partial update.
///
/// An empty body returns the todo unchanged. The completed counter moves
/// only on a false to true transition.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoResponse>, ApiError> {
    let id = TodoId::parse(&raw_id).map_err(|_| ApiError::InvalidId)?;
    let Json(req) = payload?;
    let patch = TodoPatch::from(req);
    if patch.title.as_deref() == Some("") {
        return Err(ApiError::EmptyTitle);
    }

    let existing = state
        .store
        .find_by_id(&id)
        .await
        .map_err(|e| state.store_failure(e, "update todo"))?
        .ok_or(ApiError::NotFound)?;

    if patch.is_empty() {
        return Ok(Json(existing.into()));
    }

    let newly_completed = patch.completes(&existing);

    let updated = state
        .store
        .update_fields(&id, &patch)
        .await
        .map_err(|e| state.store_failure(e, "update todo"))?
        .ok_or(ApiError::NotFound)?;

    if newly_completed {
        state.metrics.inc_todos_completed();
    }
    state.refresh_active_count().await;

    Ok(Json(updated.into()))
}

/// Hard delete a todo.
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = TodoId::parse(&raw_id).map_err(|_| ApiError::InvalidId)?;

    let removed = state
        .store
        .delete_by_id(&id)
        .await
        .map_err(|e| state.store_failure(e, "delete todo"))?;

    if !removed {
        return Err(ApiError::NotFound);
    }

    state.metrics.inc_todos_deleted();
    state.refresh_active_count().await;
    info!(id = %id, "Todo deleted");

    Ok(Json(MessageResponse {
        message: "Todo deleted".to_string(),
    }))
}
