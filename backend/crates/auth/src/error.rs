//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Shown for network failures and anything unexpected
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Provider error codes after which the stored session is useless
const SESSION_FATAL_CODES: &[&str] = &[
    "refresh_token_not_found",
    "refresh_token_already_used",
    "session_not_found",
    "session_expired",
    "user_not_found",
    "user_banned",
    "bad_jwt",
];

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Required request parameter absent
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// Form input rejected before reaching the provider
    #[error("{0}")]
    Validation(String),

    #[error("Unsupported OAuth provider: {0}")]
    UnsupportedProvider(String),

    #[error("Unsupported verification type: {0}")]
    UnsupportedOtpType(String),

    /// No session cookie for an operation that needs one
    #[error("Auth session missing")]
    SessionMissing,

    /// Session cookie present but undecodable
    #[error("Corrupt session cookie: {0}")]
    SessionCookie(String),

    /// The identity provider answered with an error status
    #[error("{message}")]
    Provider {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Transport failure talking to the identity provider
    #[error("Identity provider request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingParameter(_)
            | AuthError::UnsupportedProvider(_)
            | AuthError::UnsupportedOtpType(_) => ErrorKind::BadRequest,
            AuthError::Validation(_) => ErrorKind::UnprocessableEntity,
            AuthError::SessionMissing | AuthError::SessionCookie(_) => ErrorKind::Unauthorized,
            AuthError::Provider { status, .. } => match status {
                401 => ErrorKind::Unauthorized,
                403 => ErrorKind::Forbidden,
                404 => ErrorKind::NotFound,
                422 => ErrorKind::UnprocessableEntity,
                429 => ErrorKind::TooManyRequests,
                400..=499 => ErrorKind::BadRequest,
                _ => ErrorKind::BadGateway,
            },
            AuthError::Network(_) => ErrorKind::ServiceUnavailable,
            AuthError::Config(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.user_message())
    }

    /// Message safe to show on a form
    ///
    /// Provider rejections and validation errors are shown verbatim;
    /// everything else collapses into a generic message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Provider { status, message, .. } if *status < 500 => message.clone(),
            AuthError::Validation(message) => message.clone(),
            AuthError::UnsupportedProvider(_) | AuthError::UnsupportedOtpType(_) => {
                self.to_string()
            }
            _ => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether the stored session should be dropped after this error
    ///
    /// Definitive rejections clear the session; transport failures keep
    /// it so the next request can try again.
    pub fn is_session_fatal(&self) -> bool {
        match self {
            AuthError::Provider { status, code, .. } => {
                matches!(status, 401 | 403)
                    || code
                        .as_deref()
                        .is_some_and(|c| SESSION_FATAL_CODES.contains(&c))
            }
            AuthError::SessionCookie(_) => true,
            _ => false,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Network(e) => {
                tracing::error!(error = %e, "Identity provider unreachable");
            }
            AuthError::Config(msg) | AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Provider {
                status,
                code,
                message,
            } if *status >= 500 => {
                tracing::error!(status, code = ?code, message = %message, "Identity provider error");
            }
            AuthError::Provider {
                status,
                code,
                message,
            } => {
                tracing::warn!(status, code = ?code, message = %message, "Identity provider rejected request");
            }
            AuthError::SessionCookie(reason) => {
                tracing::warn!(reason = %reason, "Discarding corrupt session cookie");
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

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                AuthError::Validation(err.message().to_string())
            }
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<url::ParseError> for AuthError {
    fn from(err: url::ParseError) -> Self {
        AuthError::Config(err.to_string())
    }
}
