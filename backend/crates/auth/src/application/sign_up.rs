//! Sign Up Use Case
//!
//! Validates the registration form, then registers with the provider. The
//! provider emails a confirmation link that lands on `/auth/callback`.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::application::client::{AuthClient, SignUpParams};
use crate::application::config::{AuthConfig, flash_link};
use crate::domain::entity::AuthOutcome;
use crate::domain::provider::{IdentityProvider, SignUpReply};
use crate::domain::value_object::{Email, Password};
use crate::error::{AuthError, AuthResult};

/// Shown after a successful registration
pub const CHECK_EMAIL_MESSAGE: &str = "Check email to continue sign in process";

pub const NAME_MAX_LENGTH: usize = 50;

/// Registration form input
#[derive(Clone, Default)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub terms_accepted: bool,
}

impl std::fmt::Debug for SignUpInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpInput")
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("terms_accepted", &self.terms_accepted)
            .finish_non_exhaustive()
    }
}

/// Validated registration
struct Registration {
    email: Email,
    password: Password,
    metadata: Map<String, Value>,
}

fn validate_name(field: &str, value: &str, required: bool) -> AuthResult<String> {
    let value = value.trim();
    if required && value.is_empty() {
        return Err(AuthError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > NAME_MAX_LENGTH {
        return Err(AuthError::Validation(format!(
            "{field} must be at most {NAME_MAX_LENGTH} characters"
        )));
    }
    Ok(value.to_string())
}

impl SignUpInput {
    /// First failing rule wins
    fn validate(self) -> AuthResult<Registration> {
        let email = Email::new(self.email)?;
        let password = Password::new(self.password)?;

        if password.expose() != self.confirm_password {
            return Err(AuthError::Validation("Passwords do not match".to_string()));
        }

        let first_name = validate_name("First name", &self.first_name, true)?;
        let last_name = validate_name("Last name", &self.last_name, true)?;
        let display_name = validate_name("Display name", &self.display_name, false)?;

        if !self.terms_accepted {
            return Err(AuthError::Validation(
                "You must accept the terms and conditions".to_string(),
            ));
        }

        let mut metadata = Map::new();
        metadata.insert("first_name".into(), Value::String(first_name));
        metadata.insert("last_name".into(), Value::String(last_name));
        metadata.insert("display_name".into(), Value::String(display_name));

        Ok(Registration {
            email,
            password,
            metadata,
        })
    }
}

/// Sign up use case
pub struct SignUpUseCase {
    config: Arc<AuthConfig>,
}

impl SignUpUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Success redirects to the login page with [`CHECK_EMAIL_MESSAGE`]
    /// (or home, when the provider skips confirmation and signs in at once)
    pub async fn execute<P>(&self, client: &mut AuthClient<P>, input: SignUpInput) -> AuthOutcome
    where
        P: IdentityProvider + Send + Sync + 'static,
    {
        let registration = match input.validate() {
            Ok(registration) => registration,
            Err(err) => return AuthOutcome::from_error(&err),
        };

        let params = SignUpParams {
            email: registration.email.as_str().to_string(),
            password: registration.password.expose().to_string(),
            metadata: registration.metadata,
            email_redirect_to: Some(self.config.site_link("/auth/callback")),
        };

        match client.sign_up(params).await {
            Ok(SignUpReply::Pending(_)) => {
                tracing::info!(email_domain = %registration.email.domain(), "Registration pending confirmation");
                AuthOutcome::success(flash_link(
                    &self.config.login_route,
                    "message",
                    CHECK_EMAIL_MESSAGE,
                ))
            }
            Ok(SignUpReply::Session(_)) => {
                tracing::info!(email_domain = %registration.email.domain(), "Registered and signed in");
                AuthOutcome::success("/")
            }
            Err(err) => AuthOutcome::from_error(&err),
        }
    }
}
