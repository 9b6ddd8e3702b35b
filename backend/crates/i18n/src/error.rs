//! I18n Error Types
//!
//! Routing configuration errors. Resolution itself never fails.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::locale::Locale;

/// I18n-specific result type alias
pub type I18nResult<T> = Result<T, I18nError>;

#[derive(Debug, Error)]
pub enum I18nError {
    /// A route in the pathname table has no slug for a configured locale
    #[error("Route {route} has no localization for locale {locale}")]
    MissingLocalization { route: String, locale: Locale },

    /// Pathnames must be absolute, same-site paths
    #[error("Invalid pathname: {0}")]
    InvalidPathname(String),

    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// The default locale must be one of the configured locales
    #[error("Default locale {0} is not configured")]
    DefaultLocaleMissing(Locale),
}

impl I18nError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            I18nError::UnsupportedLocale(_) => ErrorKind::BadRequest,
            I18nError::MissingLocalization { .. }
            | I18nError::InvalidPathname(_)
            | I18nError::DefaultLocaleMissing(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    fn log(&self) {
        match self {
            I18nError::UnsupportedLocale(tag) => {
                tracing::debug!(tag = %tag, "Unsupported locale requested");
            }
            _ => {
                tracing::error!(error = %self, "Routing configuration error");
            }
        }
    }
}

impl IntoResponse for I18nError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            I18nError::UnsupportedLocale("fr".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            I18nError::MissingLocalization {
                route: "/about".into(),
                locale: Locale::Es
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message() {
        let err = I18nError::MissingLocalization {
            route: "/about".into(),
            locale: Locale::Es,
        };
        assert_eq!(err.to_string(), "Route /about has no localization for locale es");
    }
}
