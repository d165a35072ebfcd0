//!
//! # Custom Error Handling
//!
//! This module defines the error type `AppError` shared by the repositories,
//! the domain services and the HTTP layer. Every failure the domain can report
//! is one of a closed set of variants, so callers match on the kind of failure
//! instead of inspecting messages.
//!
//! `AppError` implements `actix_web::error::ResponseError`, turning errors into
//! HTTP responses with a JSON body. `From` implementations for `sqlx::Error`,
//! `validator::ValidationErrors`, `jsonwebtoken::errors::Error` and
//! `bcrypt::BcryptError` allow conversion with the `?` operator.

use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// Path browsers are sent to when a page needs a session.
pub const LOGIN_PATH: &str = "/login";

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// The entity addressed by a lookup key does not exist (HTTP 404).
    #[error("{0}")]
    NotFound(String),
    /// A unique key (username, email, task title) is already taken (HTTP 409).
    #[error("{0}")]
    Conflict(String),
    /// A required field is blank or malformed (HTTP 400).
    #[error("{0}")]
    Validation(String),
    /// Missing or invalid credentials on an API request (HTTP 401).
    #[error("{0}")]
    Unauthorized(String),
    /// Authenticated, but lacking the role the path requires (HTTP 403).
    #[error("{0}")]
    Forbidden(String),
    /// A page request without a session; answered with a redirect to the login form.
    #[error("Login required")]
    LoginRequired,
    /// Storage failure (HTTP 500).
    #[error("Database error: {0}")]
    Database(String),
    /// Unexpected server-side failure (HTTP 500).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result alias used across services and repositories.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// True for failures caused by the server rather than by the request.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::Internal(_))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::LoginRequired => StatusCode::FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::LoginRequired => HttpResponse::Found()
                .insert_header((header::LOCATION, LOGIN_PATH))
                .finish(),
            // Storage details stay in the log, not in the response body.
            AppError::Database(msg) => {
                log::error!("database error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Database error"
                }))
            }
            AppError::Internal(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
            other => HttpResponse::build(other.status_code()).json(json!({
                "error": other.to_string()
            })),
        }
    }
}

/// `RowNotFound` becomes `NotFound`; everything else is a storage failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::Database(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::Database(format!("migration failed: {}", error))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Token problems mean the caller is not authenticated.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid session: {}", error))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}
