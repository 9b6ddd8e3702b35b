//! Identity Provider Trait
//!
//! Interface to the hosted identity backend. Implementation is in the
//! infrastructure layer.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::entity::session::{Session, User};
use crate::domain::value_object::{OAuthProvider, OtpType};
use crate::error::AuthResult;

/// Sign-up payload
#[derive(Clone, Default)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    /// Stored as the user's `user_metadata`
    pub data: Map<String, Value>,
    /// Where the confirmation email links back to
    pub email_redirect_to: Option<String>,
    /// PKCE S256 challenge; the confirmation link then carries a code
    pub code_challenge: Option<String>,
}

impl std::fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .field("email_redirect_to", &self.email_redirect_to)
            .finish_non_exhaustive()
    }
}

/// Sign-up answer
///
/// With email confirmation enabled the provider returns the pending user
/// and no session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SignUpReply {
    Session(Session),
    Pending(User),
}

/// Identity provider operations
#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// User owning `access_token`
    async fn get_user(&self, access_token: &str) -> AuthResult<User>;

    /// Exchange a refresh token for a new session
    async fn refresh_session(&self, refresh_token: &str) -> AuthResult<Session>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session>;

    async fn sign_up(&self, request: &SignUpRequest) -> AuthResult<SignUpReply>;

    async fn sign_in_anonymously(&self) -> AuthResult<Session>;

    /// Exchange a PKCE authorization code for a session
    async fn exchange_code(&self, auth_code: &str, code_verifier: &str) -> AuthResult<Session>;

    /// Verify an email OTP token hash
    async fn verify_otp(&self, otp_type: OtpType, token_hash: &str) -> AuthResult<Session>;

    /// Revoke the session behind `access_token`
    async fn sign_out(&self, access_token: &str) -> AuthResult<()>;

    /// Send a password reset email
    async fn recover(
        &self,
        email: &str,
        redirect_to: Option<&str>,
        code_challenge: Option<&str>,
    ) -> AuthResult<()>;

    /// URL that starts the OAuth flow at `provider`
    fn authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
        code_challenge: &str,
    ) -> AuthResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_reply_with_session() {
        let json = r#"{
            "access_token": "a", "refresh_token": "r", "expires_in": 3600,
            "user": {"id": "6a1f4c2e-8f1d-4d9e-9c55-3f0b8f7b2a10"}
        }"#;
        assert!(matches!(
            serde_json::from_str::<SignUpReply>(json).unwrap(),
            SignUpReply::Session(_)
        ));
    }

    #[test]
    fn test_sign_up_reply_pending_confirmation() {
        let json = r#"{"id": "6a1f4c2e-8f1d-4d9e-9c55-3f0b8f7b2a10", "email": "ana@example.com"}"#;
        assert!(matches!(
            serde_json::from_str::<SignUpReply>(json).unwrap(),
            SignUpReply::Pending(user) if user.email.as_deref() == Some("ana@example.com")
        ));
    }
}
