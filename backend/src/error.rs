//! Application error handling
//!
//! This module provides unified error handling for the API, converting
//! internal errors to `{"error": "<message>"}` responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use coach_shared::{CalorieError, ErrorResponse, ValidationError};
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    UnsupportedGoalType(String),

    /// Body could not be read as the expected JSON shape
    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// A dependency failed and the caller asked for strict behaviour
    #[error("{0}")]
    Unavailable(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::UnsupportedGoalType(_)
            | ApiError::BadRequest(_)
            | ApiError::Internal(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<CalorieError> for ApiError {
    fn from(err: CalorieError) -> Self {
        match err {
            CalorieError::Validation(e) => ApiError::Validation(e.user_message()),
            e @ CalorieError::UnsupportedGoalType(_) => ApiError::UnsupportedGoalType(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.user_message())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self {
            error!("Internal error: {:?}", err);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (self.status(), body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
