use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} is required")]
    MissingRequiredField(&'static str),

    #[error("{message}")]
    InvalidFormat {
        field: &'static str,
        message: String,
    },

    #[error("{0}")]
    MalformedRequest(String),

    #[error("{0} must have at least one item")]
    EmptyCollection(&'static str),

    #[error("{0}")]
    DuplicateKey(String),

    #[error("Referenced event does not exist")]
    ReferenceNotFound,

    #[error("Error validating event reference")]
    ReferenceLookupFailed,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl AppError {
    pub fn invalid_format(field: &'static str, message: impl Into<String>) -> Self {
        AppError::InvalidFormat {
            field,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingRequiredField(_)
            | AppError::InvalidFormat { .. }
            | AppError::EmptyCollection(_)
            | AppError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateKey(_) => StatusCode::CONFLICT,
            AppError::ReferenceNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ReferenceLookupFailed
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingRequiredField(_) => "MISSING_REQUIRED_FIELD",
            AppError::InvalidFormat { .. } => "INVALID_FORMAT",
            AppError::EmptyCollection(_) => "EMPTY_COLLECTION",
            AppError::MalformedRequest(_) => "MALFORMED_REQUEST",
            AppError::DuplicateKey(_) => "DUPLICATE_KEY",
            AppError::ReferenceNotFound => "REFERENCE_NOT_FOUND",
            AppError::ReferenceLookupFailed => "REFERENCE_LOOKUP_FAILED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// The offending field, for errors raised by record validation.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            AppError::MissingRequiredField(field)
            | AppError::InvalidFormat { field, .. }
            | AppError::EmptyCollection(field) => Some(*field),
            AppError::ReferenceNotFound | AppError::ReferenceLookupFailed => Some("event_id"),
            _ => None,
        }
    }

    fn log(&self) {
        match self {
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
            AppError::InternalServerError(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            AppError::ReferenceLookupFailed => {
                error!(error = ?self, "Event reference lookup failed");
            }
            _ => {
                warn!(code = self.code(), message = %self, "Rejected request");
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Only expose high-level message to the client
        let public_message = match &self {
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            AppError::InternalServerError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let details = self.field().map(|field| json!({ "field": field }));

        error_response(code, public_message, details, status)
    }
}
