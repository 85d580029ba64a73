//! HTTP error mapping.
//!
//! # Responsibility
//! - Project domain errors onto the API's status/body contract.
//!
//! # Invariants
//! - Every error response body has the shape `{"error": message}`.
//! - Storage failures surface as 500 and are logged; they are never
//!   retried here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jotpad_core::{NoteServiceError, RepoError};
use log::error;
use serde_json::json;

/// API-level error with an HTTP status projection.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<NoteServiceError> for ApiError {
    fn from(err: NoteServiceError) -> Self {
        match err {
            NoteServiceError::Validation(inner) => Self::BadRequest(inner.to_string()),
            NoteServiceError::NoteNotFound(_) => Self::NotFound("Note not found".to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Validation(inner) => Self::BadRequest(inner.to_string()),
            RepoError::NotFound(_) => Self::NotFound("Note not found".to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Internal(message) => {
                error!("event=api_error module=api status=error error={message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
