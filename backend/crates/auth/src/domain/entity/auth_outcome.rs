//! Outcome of an auth flow

use crate::error::AuthError;

/// Where an auth flow sends the visitor next
///
/// Use cases return this instead of an error; the handler decides how a
/// failure is shown (error route or form flash message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Success { redirect_to: String },
    Failure { reason: String },
}

impl AuthOutcome {
    pub fn success(redirect_to: impl Into<String>) -> Self {
        Self::Success {
            redirect_to: redirect_to.into(),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// Log `err` and keep the message a visitor may see
    pub fn from_error(err: &AuthError) -> Self {
        err.log();
        Self::failure(err.user_message())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
