//! Unified error handling for the tracker services and the HTTP layer.
//!
//! Every expected failure has its own variant so callers can tell them apart;
//! infrastructure failures stay opaque and surface as a generic server error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{BugStatus, DomainError};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    // Missing entities
    #[error("Bug {0} does not exist")]
    BugNotFound(Uuid),

    #[error("Comment {0} does not exist")]
    CommentNotFound(Uuid),

    #[error("User {0} does not exist")]
    UserNotFound(Uuid),

    #[error("Reporter {0} does not exist")]
    ReporterNotFound(Uuid),

    #[error("Assignee {0} does not exist")]
    AssigneeNotFound(Uuid),

    #[error("Author {0} does not exist")]
    AuthorNotFound(Uuid),

    // Rule violations
    #[error("Comment cannot be empty")]
    EmptyContent,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Cannot move bug from {from} to {to}")]
    InvalidTransition { from: BugStatus, to: BugStatus },

    #[error("{0} already exists")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[cfg(feature = "jwt")]
    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            // One code for every missing reference; the message tells them apart
            AppError::BugNotFound(_)
            | AppError::CommentNotFound(_)
            | AppError::UserNotFound(_)
            | AppError::ReporterNotFound(_)
            | AppError::AssigneeNotFound(_)
            | AppError::AuthorNotFound(_) => "NOT_FOUND",
            AppError::EmptyContent => "EMPTY_CONTENT",
            AppError::InvalidStatus(_) => "INVALID_STATUS",
            AppError::InvalidTransition { .. } => "INVALID_TRANSITION",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::EmptyContent | AppError::InvalidStatus(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidTransition { .. } | AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for every "referenced entity missing" variant.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::BugNotFound(_)
                | AppError::CommentNotFound(_)
                | AppError::UserNotFound(_)
                | AppError::ReporterNotFound(_)
                | AppError::AssigneeNotFound(_)
                | AppError::AuthorNotFound(_)
        )
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Conflict(msg) => {
                if msg.ends_with("already exists") {
                    msg.clone()
                } else {
                    format!("{} already exists", msg)
                }
            }

            // Hide details for internal/security errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            #[cfg(feature = "jwt")]
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::Password(msg) => AppError::Validation(msg),
            DomainError::EmptyContent => AppError::EmptyContent,
            DomainError::InvalidStatus(literal) => AppError::InvalidStatus(literal),
            DomainError::InvalidTransition { from, to } => AppError::InvalidTransition { from, to },
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
