use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use cabinet_core::{RegistryError, StoreError};

#[derive(Debug)]
pub enum AppError {
    Auth(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    /// A store or registry operation failed remotely. The message is shown
    /// to the user as-is.
    Storage(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Storage(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Internal(msg) => {
                // Log the real error server-side, return generic message to client
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorBody {
            success: false,
            error: message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:#}", e);
        AppError::Internal("Internal server error".to_string())
    }
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::Validation(msg) => AppError::BadRequest(msg),
            RegistryError::Download {
                source: StoreError::NotFound(_),
                ref name,
                ..
            } => AppError::NotFound(format!("no such file: {name}")),
            RegistryError::Delete {
                source: StoreError::NotFound(_),
                ref name,
                ..
            } => AppError::NotFound(format!("no such file: {name}")),
            RegistryError::Copy {
                source: StoreError::NotFound(_),
                ref from,
                ..
            } => AppError::NotFound(format!("no such file: {from}")),
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => AppError::NotFound(format!("no such object: {key}")),
            StoreError::AlreadyExists(key) => {
                AppError::Conflict(format!("a file with this name already exists: {key}"))
            }
            StoreError::InvalidKey(msg) => AppError::BadRequest(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}
