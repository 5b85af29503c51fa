use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use service::auth::errors::AuthError;
use service::errors::ServiceError;
use service::validation::ValidationErrors;

/// JSON error body: `{"error": title, "detail"?: ..., "fields"?: [...]}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
    pub fields: Option<ValidationErrors>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a ValidationErrors>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail, fields: None }
    }

    /// Every authentication failure looks the same to the client.
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", None)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", None)
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(detail.into()))
    }

    pub fn validation(fields: ValidationErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            title: "Validation Error",
            detail: None,
            fields: Some(fields),
        }
    }

    /// Logs the cause; the client only sees a generic body.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!(err = %cause, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.title,
            detail: self.detail.as_deref(),
            fields: self.fields.as_ref(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for JsonApiError {
    fn from(fields: ValidationErrors) -> Self { Self::validation(fields) }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(fields) => Self::validation(fields),
            AuthError::DuplicateEmail => Self::bad_request("email already registered"),
            AuthError::NotFound => Self::not_found(),
            e if e.is_unauthenticated() => Self::unauthorized(),
            other => {
                error!(code = other.code(), "auth failure");
                Self::internal(other)
            }
        }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(fields) => Self::validation(fields),
            ServiceError::NotFound(_) => Self::not_found(),
            ServiceError::Model(models::errors::ModelError::Validation(msg)) => Self::bad_request(msg),
            other => Self::internal(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
