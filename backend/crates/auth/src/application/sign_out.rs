//! Sign Out Use Case

use std::sync::Arc;

use crate::application::client::AuthClient;
use crate::application::config::AuthConfig;
use crate::domain::entity::AuthOutcome;
use crate::domain::provider::IdentityProvider;

/// Revoke the session and send the visitor to the login page
pub struct SignOutUseCase {
    config: Arc<AuthConfig>,
}

impl SignOutUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    pub async fn execute<P>(&self, client: &mut AuthClient<P>) -> AuthOutcome
    where
        P: IdentityProvider + Send + Sync + 'static,
    {
        match client.sign_out().await {
            Ok(()) => {
                tracing::info!("Signed out");
                AuthOutcome::success(self.config.login_route.as_str())
            }
            Err(err) => AuthOutcome::from_error(&err),
        }
    }
}
