//! Per-request auth client
//!
//! An [`AuthClient`] owns a snapshot of one request's cookies. Every
//! operation that changes the session records cookie writes, which are
//! both applied to the snapshot (so later reads in the same request see
//! them) and queued for the caller to mirror into the request and
//! response. Clients are never shared between requests; the
//! [`AuthClientFactory`] shares only the stateless provider transport.

use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;

use platform::cookie::{Cookie, CookieSet};
use platform::crypto::PkcePair;

use crate::application::config::AuthConfig;
use crate::application::event_bus::AuthEventBus;
use crate::application::session_store::SessionCookieStore;
use crate::domain::entity::{AuthChange, AuthEvent, Session, User};
use crate::domain::provider::{IdentityProvider, SignUpReply, SignUpRequest};
use crate::domain::value_object::{OAuthProvider, OtpType};
use crate::error::{AuthError, AuthResult};

/// Builds one [`AuthClient`] per request
pub struct AuthClientFactory<P> {
    provider: Arc<P>,
    config: Arc<AuthConfig>,
    store: SessionCookieStore,
    events: Option<AuthEventBus>,
}

impl<P> Clone for AuthClientFactory<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            config: self.config.clone(),
            store: self.store.clone(),
            events: self.events.clone(),
        }
    }
}

impl<P> AuthClientFactory<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    pub fn new(provider: Arc<P>, config: Arc<AuthConfig>) -> Self {
        let store = SessionCookieStore::new(&config);
        Self {
            provider,
            config,
            store,
            events: None,
        }
    }

    /// Publish auth state changes of every client built from here
    pub fn with_event_bus(mut self, events: AuthEventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(&self) -> &Arc<AuthConfig> {
        &self.config
    }

    pub fn store(&self) -> &SessionCookieStore {
        &self.store
    }

    /// Fresh client over a copy of `cookies`
    pub fn for_request(&self, cookies: &CookieSet) -> AuthClient<P> {
        AuthClient {
            provider: self.provider.clone(),
            config: self.config.clone(),
            store: self.store.clone(),
            events: self.events.clone(),
            jar: cookies.clone(),
            writes: CookieSet::new(),
        }
    }
}

/// Sign-up input after validation
#[derive(Debug, Clone)]
pub struct SignUpParams {
    pub email: String,
    pub password: String,
    pub metadata: Map<String, Value>,
    pub email_redirect_to: Option<String>,
}

/// Auth client bound to one request's cookies
pub struct AuthClient<P> {
    provider: Arc<P>,
    config: Arc<AuthConfig>,
    store: SessionCookieStore,
    events: Option<AuthEventBus>,
    jar: CookieSet,
    writes: CookieSet,
}

impl<P> AuthClient<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    /// Cookies as they stand after this client's writes
    pub fn cookies(&self) -> &CookieSet {
        &self.jar
    }

    /// Cookie writes recorded so far, leaving none behind
    pub fn take_cookie_writes(&mut self) -> CookieSet {
        std::mem::take(&mut self.writes)
    }

    fn apply(&mut self, cookie: Cookie<'static>) {
        self.jar.set(cookie.clone());
        self.writes.set(cookie);
    }

    fn apply_all(&mut self, cookies: CookieSet) {
        for cookie in cookies {
            self.apply(cookie);
        }
    }

    fn publish(&self, event: AuthEvent, session: Option<&Session>) {
        if let Some(events) = &self.events {
            events.publish(AuthChange::new(event, session.cloned()));
        }
    }

    fn save_session(&mut self, session: &Session) -> AuthResult<()> {
        let writes = self.store.store(&self.jar, session)?;
        self.apply_all(writes);
        Ok(())
    }

    fn clear_session(&mut self) {
        let writes = self.store.clear(&self.jar);
        if !writes.is_empty() {
            self.apply_all(writes);
            self.publish(AuthEvent::SignedOut, None);
        }
    }

    /// Store a new session and announce it
    fn establish(&mut self, session: Session, event: AuthEvent) -> AuthResult<Session> {
        let session = session.with_expiry_from(Utc::now());
        self.save_session(&session)?;
        self.publish(event, Some(&session));
        Ok(session)
    }

    /// Store a PKCE verifier and return the challenge to send
    fn begin_pkce(&mut self) -> PkcePair {
        let pair = PkcePair::generate();
        let cookie = self.store.verifier_cookie(&pair.verifier);
        self.apply(cookie);
        pair
    }

    fn end_pkce(&mut self) {
        if self.store.load_verifier(&self.jar).is_some() {
            let removal = self.store.verifier_removal();
            self.apply(removal);
        }
    }

    /// Drop the stored session when `err` says it is dead
    fn on_session_error(&mut self, err: &AuthError) {
        if err.is_session_fatal() {
            self.clear_session();
        }
    }

    /// Stored session, refreshed first when the access token is about to expire
    pub async fn get_session(&mut self) -> AuthResult<Option<Session>> {
        let session = match self.store.load(&self.jar) {
            Ok(Some(session)) => session,
            Ok(None) => return Ok(None),
            Err(err) => {
                self.on_session_error(&err);
                return Err(err);
            }
        };

        if !session.expires_within(Utc::now(), self.config.refresh_margin_secs) {
            return Ok(Some(session));
        }

        tracing::debug!("Access token expiring, refreshing session");
        match self.provider.refresh_session(&session.refresh_token).await {
            Ok(refreshed) => self
                .establish(refreshed, AuthEvent::TokenRefreshed)
                .map(Some),
            Err(err) => {
                self.on_session_error(&err);
                Err(err)
            }
        }
    }

    /// Current user, validated by the provider (one round trip)
    pub async fn get_user(&mut self) -> AuthResult<Option<User>> {
        let Some(session) = self.get_session().await? else {
            return Ok(None);
        };

        match self.provider.get_user(&session.access_token).await {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                self.on_session_error(&err);
                Err(err)
            }
        }
    }

    pub async fn sign_in_with_password(&mut self, email: &str, password: &str) -> AuthResult<Session> {
        let session = self.provider.sign_in_with_password(email, password).await?;
        self.establish(session, AuthEvent::SignedIn)
    }

    pub async fn sign_in_anonymously(&mut self) -> AuthResult<Session> {
        let session = self.provider.sign_in_anonymously().await?;
        self.establish(session, AuthEvent::SignedIn)
    }

    /// Register; the confirmation link carries a PKCE code for `/auth/callback`
    pub async fn sign_up(&mut self, params: SignUpParams) -> AuthResult<SignUpReply> {
        let pkce = self.begin_pkce();
        let request = SignUpRequest {
            email: params.email,
            password: params.password,
            data: params.metadata,
            email_redirect_to: params.email_redirect_to,
            code_challenge: Some(pkce.challenge),
        };

        match self.provider.sign_up(&request).await? {
            SignUpReply::Session(session) => {
                self.end_pkce();
                let session = self.establish(session, AuthEvent::SignedIn)?;
                Ok(SignUpReply::Session(session))
            }
            pending @ SignUpReply::Pending(_) => Ok(pending),
        }
    }

    /// Authorize URL for `provider`; the verifier waits in a cookie for the callback
    pub fn sign_in_with_oauth(&mut self, provider: OAuthProvider, redirect_to: &str) -> AuthResult<String> {
        let pkce = self.begin_pkce();
        self.provider
            .authorize_url(provider, redirect_to, &pkce.challenge)
    }

    /// Finish a PKCE flow
    ///
    /// The verifier cookie is consumed whatever the outcome; a code can
    /// only be exchanged once.
    pub async fn exchange_code_for_session(&mut self, auth_code: &str) -> AuthResult<Session> {
        let verifier = self
            .store
            .load_verifier(&self.jar)
            .ok_or(AuthError::MissingParameter("code_verifier"))?;
        self.end_pkce();

        let session = self.provider.exchange_code(auth_code, &verifier).await?;
        self.establish(session, AuthEvent::SignedIn)
    }

    pub async fn verify_otp(&mut self, otp_type: OtpType, token_hash: &str) -> AuthResult<Session> {
        let session = self.provider.verify_otp(otp_type, token_hash).await?;
        let event = match otp_type {
            OtpType::Recovery => AuthEvent::PasswordRecovery,
            _ => AuthEvent::SignedIn,
        };
        self.establish(session, event)
    }

    /// Revoke the session and clear its cookies
    ///
    /// A transport failure leaves the session in place so the user can try
    /// again; a provider that no longer knows the session still clears it.
    pub async fn sign_out(&mut self) -> AuthResult<()> {
        let session = match self.store.load(&self.jar) {
            Ok(session) => session,
            Err(err) => {
                err.log();
                None
            }
        };

        if let Some(session) = session {
            match self.provider.sign_out(&session.access_token).await {
                Ok(()) => {}
                Err(err @ AuthError::Provider { status: 401 | 403 | 404, .. }) => {
                    tracing::debug!(error = %err, "Session already gone at provider");
                }
                Err(err) => return Err(err),
            }
        }

        self.clear_session();
        Ok(())
    }

    /// Send a reset email; its link comes back through `/auth/callback`
    pub async fn reset_password_for_email(&mut self, email: &str, redirect_to: Option<&str>) -> AuthResult<()> {
        let pkce = self.begin_pkce();
        self.provider
            .recover(email, redirect_to, Some(&pkce.challenge))
            .await
    }
}
