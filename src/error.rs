use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::response::ApiResponse;

/// Failure states of one dispatch. The first three short-circuit before
/// any write; `Persistence` can surface after messages were already
/// inserted (no compensating rollback is attempted).
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{0}")]
    Validation(String),

    #[error("Course not found")]
    CourseNotFound,

    #[error("Only the course instructor can send bulk messages")]
    NotInstructor,

    #[error("Failed to send bulk message")]
    Persistence(#[source] anyhow::Error),
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = match &self {
            DispatchError::Validation(_) => StatusCode::BAD_REQUEST,
            DispatchError::CourseNotFound => StatusCode::NOT_FOUND,
            DispatchError::NotInstructor => StatusCode::FORBIDDEN,
            DispatchError::Persistence(source) => {
                // Full cause goes to the log, never to the response body.
                tracing::error!(error = %source, "Bulk dispatch failed during persistence");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiResponse::<()>::error(self.to_string());

        (status, Json(body)).into_response()
    }
}
