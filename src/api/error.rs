//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned to clients.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Short human-readable message.
    pub detail: String,
}

/// Failures a handler reports to the client.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Path id is not a well-formed todo id.
    #[error("Invalid todo ID")]
    InvalidId,

    /// No todo has this id.
    #[error("Todo not found")]
    NotFound,

    /// Create or update request with an empty title.
    #[error("title must not be empty")]
    EmptyTitle,

    /// Request body could not be extracted.
    #[error("{detail}")]
    InvalidBody {
        /// Status chosen by the extractor.
        status: StatusCode,
        /// Extractor message.
        detail: String,
    },

    /// Database operation failed.
    #[error("Failed to {action}")]
    Storage {
        /// What the handler was doing, e.g. "fetch todos".
        action: &'static str,
    },

    /// Readiness check could not reach the database.
    #[error("Database not ready")]
    NotReady,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::EmptyTitle => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidBody { status, .. } => *status,
            Self::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotReady => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        Self::InvalidBody {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
