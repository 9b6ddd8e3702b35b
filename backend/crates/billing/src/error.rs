//! Billing Error Types
//!
//! Billing-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::presentation::dto::SubscriptionDetailResponse;

/// Billing-specific result type alias
pub type BillingResult<T> = Result<T, BillingError>;

pub const CUSTOMER_NOT_FOUND_MESSAGE: &str = "Customer ID not found";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Error)]
pub enum BillingError {
    /// No signed-in user on the request
    #[error("Not authenticated")]
    Unauthenticated,

    /// Signed in, but no billing customer is linked to the account
    #[error("Customer ID not found")]
    CustomerNotFound,

    /// Resource exists but belongs to another customer, or does not exist
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(String),

    /// Upstream API answered with an error status
    #[error("{service} error ({status}): {detail}")]
    Upstream {
        service: &'static str,
        status: u16,
        detail: String,
    },

    /// Transport failure or undecodable body
    #[error("Billing request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BillingError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BillingError::Unauthenticated => ErrorKind::Unauthorized,
            BillingError::CustomerNotFound | BillingError::SubscriptionNotFound(_) => {
                ErrorKind::NotFound
            }
            BillingError::Upstream { .. } => ErrorKind::BadGateway,
            BillingError::Network(_) => ErrorKind::ServiceUnavailable,
            BillingError::Config(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.public_message())
    }

    /// Message returned in the `error` field
    ///
    /// Upstream detail never leaves the service.
    pub fn public_message(&self) -> &'static str {
        match self {
            BillingError::Unauthenticated => "Not authenticated",
            BillingError::CustomerNotFound => CUSTOMER_NOT_FOUND_MESSAGE,
            BillingError::SubscriptionNotFound(_) => "Subscription not found",
            _ => GENERIC_ERROR_MESSAGE,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            BillingError::Upstream {
                service,
                status,
                detail,
            } => {
                tracing::error!(service, status, detail = %detail, "Billing upstream error");
            }
            BillingError::Network(e) => {
                tracing::error!(error = %e, "Billing upstream unreachable");
            }
            BillingError::Config(msg) => {
                tracing::error!(message = %msg, "Billing configuration error");
            }
            BillingError::SubscriptionNotFound(id) => {
                tracing::warn!(subscription_id = %id, "Subscription lookup refused");
            }
            BillingError::Unauthenticated | BillingError::CustomerNotFound => {
                tracing::debug!(error = %self, "Billing request rejected");
            }
        }
    }
}

/// Errors answer in the single-resource shape: `{ "error": ... }`
impl IntoResponse for BillingError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        (status, Json(SubscriptionDetailResponse::failed(self.public_message()))).into_response()
    }
}

impl From<url::ParseError> for BillingError {
    fn from(err: url::ParseError) -> Self {
        BillingError::Config(err.to_string())
    }
}
