//! Error kinds and the wire-level error envelope

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of every failure the API can report.
///
/// The HTTP boundary dispatches on the kind alone, never on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,
    MethodNotAllowed,
    PayloadTooLarge,
    Internal,
}

impl ErrorKind {
    /// Machine-readable code placed in the `code` field of the envelope
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_FAILED",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorKind::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ErrorKind::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    /// HTTP status code for this kind
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::Conflict => 409,
            ErrorKind::MethodNotAllowed => 405,
            ErrorKind::PayloadTooLarge => 413,
            ErrorKind::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error response body: `{ code, message, details, stack? }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default = "empty_details")]
    pub details: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

fn empty_details() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

impl ErrorBody {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code: kind.code().to_string(),
            message: message.into(),
            details: empty_details(),
            stack: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    pub fn with_stack(mut self, stack: Option<String>) -> Self {
        self.stack = stack;
        self
    }
}

/// Errors raised while interpreting request input before it reaches a service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("limit must be an integer between 1 and {max}")]
    LimitOutOfRange { max: i64 },

    #[error("offset must be a non-negative integer")]
    NegativeOffset,

    #[error("unknown role: {0}")]
    UnknownRole(String),
}
