//! Auth Error Types
//!
//! The closed set of failures raised by session authentication and the
//! CSRF guard. They integrate with the unified `kernel::error::AppError`
//! envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No usable session: missing, unknown, or owned by a withdrawn user
    #[error("Authentication required")]
    Unauthenticated,

    /// The session existed but its expiry has passed
    #[error("Session has expired")]
    SessionExpired,

    /// Double-submit token missing or mismatched on a mutating request
    #[error("CSRF token missing or invalid")]
    CsrfValidationFailed,

    /// Session or user store failure
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
            AuthError::CsrfValidationFailed => StatusCode::FORBIDDEN,
            AuthError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Unauthenticated | AuthError::SessionExpired => ErrorKind::Unauthorized,
            AuthError::CsrfValidationFailed => ErrorKind::Forbidden,
            AuthError::Persistence(_) => ErrorKind::InternalServerError,
        }
    }

    /// Machine-readable code of the response envelope
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated => "unauthorized",
            AuthError::SessionExpired => "session_expired",
            AuthError::CsrfValidationFailed => "csrf_validation_failed",
            AuthError::Persistence(_) => "internal_server_error",
        }
    }

    /// Convert to AppError
    ///
    /// Persistence details stay in the logs, not in the response body.
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            AuthError::Persistence(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        AppError::new(self.kind(), message).with_code(self.code())
    }

    fn log(&self) {
        match self {
            AuthError::Persistence(msg) => {
                tracing::error!(message = %msg, "Auth persistence error");
            }
            AuthError::CsrfValidationFailed => {
                tracing::warn!("CSRF validation failed");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Persistence(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.log();
        err.to_app_error()
    }
}
