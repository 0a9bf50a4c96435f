//! HTTP error mapping.
//!
//! Every failure renders as `{"msg": "..."}`. Internal details of
//! `Server` errors are logged and never sent to the client.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lifedesk_core::{AuthServiceError, OwnedRecord, RecordServiceError, RepoError};
use log::error;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    Unauthenticated,
    Forbidden,
    /// Carries the record kind label (`"Task"`).
    NotFound(&'static str),
    Validation(String),
    DuplicateEmail,
    InvalidCredentials,
    Server(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::DuplicateEmail => StatusCode::CONFLICT,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Unauthenticated => "No token, authorization denied".to_string(),
            Self::Forbidden => "Not authorized".to_string(),
            Self::NotFound(kind) => format!("{kind} not found"),
            Self::Validation(msg) => msg.clone(),
            Self::DuplicateEmail => "User already exists".to_string(),
            Self::InvalidCredentials => "Invalid Credentials".to_string(),
            Self::Server(_) => "Server Error".to_string(),
        }
    }

    /// Maps a record service failure for the record kind `R`.
    pub fn from_record<R: OwnedRecord>(err: RecordServiceError) -> Self {
        match err {
            RecordServiceError::Validation(err) => Self::Validation(err.to_string()),
            RecordServiceError::NotFound(_) => Self::NotFound(R::LABEL),
            RecordServiceError::Forbidden(_) => Self::Forbidden,
            other => Self::Server(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Server(detail) = &self {
            error!("event=http_error module=server status=error detail={detail}");
        }
        (self.status(), Json(json!({ "msg": self.message() }))).into_response()
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(value: AuthServiceError) -> Self {
        match value {
            AuthServiceError::MissingField(field) => Self::Validation(format!("{field} is required")),
            AuthServiceError::DuplicateEmail => Self::DuplicateEmail,
            AuthServiceError::InvalidCredentials => Self::InvalidCredentials,
            AuthServiceError::Unauthenticated => Self::Unauthenticated,
            other => Self::Server(other.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::from(AuthServiceError::from(value))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::Validation(value.body_text())
    }
}
