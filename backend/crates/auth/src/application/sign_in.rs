//! Sign In Use Cases
//!
//! Password, social (OAuth) and guest sign-in.

use std::sync::Arc;

use crate::application::client::AuthClient;
use crate::application::config::AuthConfig;
use crate::domain::entity::AuthOutcome;
use crate::domain::provider::IdentityProvider;
use crate::domain::value_object::{Email, OAuthProvider};
use crate::error::AuthError;

/// Where a signed-in visitor lands
const HOME_ROUTE: &str = "/";

/// Sign in input
#[derive(Clone)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SignInInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInInput")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Email + password sign in
pub struct SignInUseCase;

impl SignInUseCase {
    pub async fn execute<P>(&self, client: &mut AuthClient<P>, input: SignInInput) -> AuthOutcome
    where
        P: IdentityProvider + Send + Sync + 'static,
    {
        let email = match Email::new(input.email) {
            Ok(email) => email,
            Err(err) => return AuthOutcome::from_error(&AuthError::from(err)),
        };
        if input.password.is_empty() {
            return AuthOutcome::failure("Password is required");
        }

        match client.sign_in_with_password(email.as_str(), &input.password).await {
            Ok(_) => {
                tracing::info!(email_domain = %email.domain(), "Signed in with password");
                AuthOutcome::success(HOME_ROUTE)
            }
            Err(err) => AuthOutcome::from_error(&err),
        }
    }
}

/// Start a social login
///
/// Success carries the provider's absolute authorize URL; the provider
/// sends the visitor back to `/auth/callback`.
pub struct OAuthSignInUseCase {
    config: Arc<AuthConfig>,
}

impl OAuthSignInUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    pub fn execute<P>(&self, client: &mut AuthClient<P>, provider: &str) -> AuthOutcome
    where
        P: IdentityProvider + Send + Sync + 'static,
    {
        let provider = match provider.parse::<OAuthProvider>() {
            Ok(provider) => provider,
            Err(err) => return AuthOutcome::from_error(&err),
        };

        let callback = self.config.site_link("/auth/callback");
        match client.sign_in_with_oauth(provider, &callback) {
            Ok(url) => {
                tracing::debug!(%provider, "Redirecting to OAuth provider");
                AuthOutcome::success(url)
            }
            Err(err) => AuthOutcome::from_error(&err),
        }
    }
}

/// Anonymous sign in
pub struct GuestSignInUseCase;

impl GuestSignInUseCase {
    pub async fn execute<P>(&self, client: &mut AuthClient<P>) -> AuthOutcome
    where
        P: IdentityProvider + Send + Sync + 'static,
    {
        match client.sign_in_anonymously().await {
            Ok(_) => {
                tracing::info!("Signed in as guest");
                AuthOutcome::success(HOME_ROUTE)
            }
            Err(err) => AuthOutcome::from_error(&err),
        }
    }
}
