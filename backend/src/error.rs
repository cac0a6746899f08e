//! Application error handling
//!
//! Every failure is tagged with an [`ErrorKind`]; the response status, code
//! and envelope are derived from that kind alone.

use crate::auth::TokenError;
use crate::config::AppConfig;
use crate::repositories::RepositoryError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use beer_review_shared::{ErrorBody, ErrorKind, InputError};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed")]
    InvalidFields(#[from] ValidationErrors),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid token: {0}")]
    Token(#[from] TokenError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    /// The tag the HTTP boundary dispatches on
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) | ApiError::InvalidFields(_) => ErrorKind::Validation,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Unauthorized(_) | ApiError::Token(_) => ErrorKind::Unauthorized,
            ApiError::Forbidden(_) => ErrorKind::Forbidden,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::MethodNotAllowed(_) => ErrorKind::MethodNotAllowed,
            ApiError::PayloadTooLarge => ErrorKind::PayloadTooLarge,
            ApiError::Internal(_) | ApiError::Database(_) => ErrorKind::Internal,
        }
    }

    fn to_body(&self, production: bool) -> ErrorBody {
        let kind = self.kind();
        match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::Conflict(msg)
            | ApiError::MethodNotAllowed(msg) => ErrorBody::new(kind, msg.clone()),
            ApiError::PayloadTooLarge => ErrorBody::new(kind, "The request body is too large"),
            ApiError::InvalidFields(errors) => ErrorBody::new(kind, "Request validation failed")
                .with_details(serde_json::to_value(errors).unwrap_or_else(|_| json!({}))),
            ApiError::Token(err) => ErrorBody::new(kind, err.to_string())
                .with_details(json!({ "reason": err.reason() })),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                internal_body(production, format!("{:?}", err))
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                internal_body(production, format!("{:?}", err))
            }
        }
    }
}

fn internal_body(production: bool, stack: String) -> ErrorBody {
    let body = ErrorBody::new(ErrorKind::Internal, "An internal error occurred");
    if production {
        body
    } else {
        body.with_stack(Some(stack))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = self.to_body(AppConfig::is_production());

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => ApiError::Conflict(msg),
            RepositoryError::ForeignKey(msg) => ApiError::NotFound(msg),
            RepositoryError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
