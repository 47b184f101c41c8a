//! HTTP API: todo CRUD routes, health checks and metrics exposition.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use error::ApiError;
pub use handlers::AppState;
pub use routes::create_router;
