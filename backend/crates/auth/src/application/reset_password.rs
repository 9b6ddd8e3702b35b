//! Password Reset Use Case
//!
//! Sends the reset email. The link comes back through `/auth/callback`,
//! which signs the visitor in and forwards them to the password form.

use std::sync::Arc;

use crate::application::client::AuthClient;
use crate::application::config::{AuthConfig, flash_link};
use crate::domain::entity::AuthOutcome;
use crate::domain::provider::IdentityProvider;
use crate::domain::value_object::Email;
use crate::error::AuthError;

/// Same answer whether or not the address has an account
pub const RESET_SENT_MESSAGE: &str = "If an account exists for that email, a reset link is on its way";

/// Page the reset link lands on once signed in
const UPDATE_PASSWORD_ROUTE: &str = "/account/password";

pub struct ResetPasswordUseCase {
    config: Arc<AuthConfig>,
}

impl ResetPasswordUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    pub async fn execute<P>(&self, client: &mut AuthClient<P>, email: String) -> AuthOutcome
    where
        P: IdentityProvider + Send + Sync + 'static,
    {
        let email = match Email::new(email) {
            Ok(email) => email,
            Err(err) => return AuthOutcome::from_error(&AuthError::from(err)),
        };

        let redirect_to = flash_link(
            &self.config.site_link("/auth/callback"),
            "redirect_to",
            UPDATE_PASSWORD_ROUTE,
        );

        match client
            .reset_password_for_email(email.as_str(), Some(&redirect_to))
            .await
        {
            Ok(()) => {
                tracing::info!(email_domain = %email.domain(), "Password reset requested");
                AuthOutcome::success(flash_link(
                    &self.config.forgot_password_route,
                    "message",
                    RESET_SENT_MESSAGE,
                ))
            }
            Err(err) => AuthOutcome::from_error(&err),
        }
    }
}
