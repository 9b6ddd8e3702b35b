//! Callback Use Cases
//!
//! Land the visitor after an email link or an OAuth round trip. Both end
//! in a redirect: the requested target on success, the error route on any
//! failure. Failures carry no detail to the visitor.

use std::sync::Arc;

use crate::application::client::AuthClient;
use crate::application::config::AuthConfig;
use crate::domain::entity::AuthOutcome;
use crate::domain::provider::IdentityProvider;
use crate::domain::value_object::{OtpType, RedirectTarget};

/// `GET /auth/callback` input
#[derive(Debug, Clone, Default)]
pub struct ExchangeCodeInput {
    pub code: Option<String>,
    pub redirect_to: Option<String>,
}

/// Exchange an authorization code for a session
pub struct ExchangeCodeUseCase {
    config: Arc<AuthConfig>,
}

impl ExchangeCodeUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    pub async fn execute<P>(&self, client: &mut AuthClient<P>, input: ExchangeCodeInput) -> AuthOutcome
    where
        P: IdentityProvider + Send + Sync + 'static,
    {
        let Some(code) = input.code.filter(|c| !c.is_empty()) else {
            tracing::debug!("Callback without code");
            return AuthOutcome::failure("missing code");
        };

        match client.exchange_code_for_session(&code).await {
            Ok(_) => {
                let target =
                    RedirectTarget::or_default(input.redirect_to.as_deref(), &self.config.default_redirect);
                tracing::info!(redirect_to = %target, "Code exchanged for session");
                AuthOutcome::success(target.as_str())
            }
            Err(err) => AuthOutcome::from_error(&err),
        }
    }
}

/// `GET /auth/confirm` input
#[derive(Debug, Clone, Default)]
pub struct ConfirmOtpInput {
    pub token_hash: Option<String>,
    pub otp_type: Option<String>,
    pub redirect_to: Option<String>,
}

/// Verify an email token hash (sign-up, invite, magic link, recovery, email change)
pub struct ConfirmOtpUseCase {
    config: Arc<AuthConfig>,
}

impl ConfirmOtpUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    pub async fn execute<P>(&self, client: &mut AuthClient<P>, input: ConfirmOtpInput) -> AuthOutcome
    where
        P: IdentityProvider + Send + Sync + 'static,
    {
        let token_hash = input.token_hash.filter(|t| !t.is_empty());
        let otp_type = input.otp_type.filter(|t| !t.is_empty());
        let (Some(token_hash), Some(otp_type)) = (token_hash, otp_type) else {
            tracing::debug!("Confirm link missing token_hash or type");
            return AuthOutcome::failure("missing token_hash or type");
        };

        let otp_type = match otp_type.parse::<OtpType>() {
            Ok(otp_type) => otp_type,
            Err(err) => return AuthOutcome::from_error(&err),
        };

        match client.verify_otp(otp_type, &token_hash).await {
            Ok(_) => {
                let target =
                    RedirectTarget::or_default(input.redirect_to.as_deref(), &self.config.default_redirect);
                tracing::info!(%otp_type, redirect_to = %target, "Email link verified");
                AuthOutcome::success(target.as_str())
            }
            Err(err) => AuthOutcome::from_error(&err),
        }
    }
}
