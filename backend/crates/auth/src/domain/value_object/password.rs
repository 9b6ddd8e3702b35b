//! Password Value Object
//!
//! Length rules only; the provider hashes and stores it.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

pub const PASSWORD_MIN_LENGTH: usize = 8;
/// bcrypt truncates beyond 72 bytes
pub const PASSWORD_MAX_LENGTH: usize = 72;

/// Candidate password for sign-up
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> AppResult<Self> {
        let password = password.into();
        let len = password.chars().count();

        if len < PASSWORD_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Password must be at least {PASSWORD_MIN_LENGTH} characters"
            )));
        }

        if len > PASSWORD_MAX_LENGTH || password.len() > PASSWORD_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Password must be at most {PASSWORD_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}
