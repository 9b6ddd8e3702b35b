//! GoTrue REST client
//!
//! [`IdentityProvider`] over the hosted auth API (`<project>/auth/v1`).
//! Every request carries the anon key as `apikey`; user-scoped calls
//! authorize with the user's access token instead of the anon key.

use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use crate::application::config::AuthConfig;
use crate::domain::entity::{Session, User};
use crate::domain::provider::{IdentityProvider, SignUpReply, SignUpRequest};
use crate::domain::value_object::{OAuthProvider, OtpType};
use crate::error::{AuthError, AuthResult};
use platform::crypto::PkcePair;

/// Error payload; field names differ between API versions
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    error_code: Option<String>,
    /// HTTP status on older versions, error code string on newer ones
    code: Option<Value>,
}

impl ErrorBody {
    fn into_error(self, status: u16) -> AuthError {
        let code = self
            .error_code
            .clone()
            .or_else(|| self.code.as_ref().and_then(Value::as_str).map(str::to_string))
            .or_else(|| self.error.clone());

        let message = self
            .msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
            .unwrap_or_else(|| format!("Request failed with status {status}"));

        AuthError::Provider {
            status,
            code,
            message,
        }
    }
}

#[derive(Clone)]
pub struct GoTrueClient {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl std::fmt::Debug for GoTrueClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoTrueClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GoTrueClient {
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.auth_api_url(),
            anon_key: config.anon_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request authorized as the project (anon key)
    fn anon(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    /// Request authorized as the user
    fn as_user(&self, builder: RequestBuilder, access_token: &str) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
    }

    /// Pass 2xx through; turn anything else into [`AuthError::Provider`]
    async fn ensure_success(response: Response, operation: &'static str) -> AuthResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let err = parsed.into_error(status);
        tracing::debug!(operation, status, error = %err, "Identity provider returned error");
        Err(err)
    }

    async fn session_from(response: Response, operation: &'static str) -> AuthResult<Session> {
        let response = Self::ensure_success(response, operation).await?;
        let session = response.json::<Session>().await?;
        Ok(session.with_expiry_from(Utc::now()))
    }

    async fn token(&self, grant_type: &str, body: Value, operation: &'static str) -> AuthResult<Session> {
        let request = self
            .http
            .post(self.endpoint("/token"))
            .query(&[("grant_type", grant_type)])
            .json(&body);
        let response = self.anon(request).send().await?;
        Self::session_from(response, operation).await
    }
}

impl IdentityProvider for GoTrueClient {
    async fn get_user(&self, access_token: &str) -> AuthResult<User> {
        let request = self.http.get(self.endpoint("/user"));
        let response = self.as_user(request, access_token).send().await?;
        let response = Self::ensure_success(response, "get user").await?;
        Ok(response.json::<User>().await?)
    }

    async fn refresh_session(&self, refresh_token: &str) -> AuthResult<Session> {
        self.token(
            "refresh_token",
            json!({ "refresh_token": refresh_token }),
            "refresh session",
        )
        .await
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session> {
        self.token(
            "password",
            json!({ "email": email, "password": password }),
            "password sign in",
        )
        .await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> AuthResult<SignUpReply> {
        let mut body = json!({
            "email": request.email,
            "password": request.password,
            "data": request.data,
        });
        if let Some(challenge) = &request.code_challenge {
            body["code_challenge"] = json!(challenge);
            body["code_challenge_method"] = json!(PkcePair::method());
        }

        let mut builder = self.http.post(self.endpoint("/signup")).json(&body);
        if let Some(redirect_to) = &request.email_redirect_to {
            builder = builder.query(&[("redirect_to", redirect_to)]);
        }

        let response = self.anon(builder).send().await?;
        let response = Self::ensure_success(response, "sign up").await?;
        Ok(match response.json::<SignUpReply>().await? {
            SignUpReply::Session(session) => SignUpReply::Session(session.with_expiry_from(Utc::now())),
            pending => pending,
        })
    }

    async fn sign_in_anonymously(&self) -> AuthResult<Session> {
        let request = self.http.post(self.endpoint("/signup")).json(&json!({}));
        let response = self.anon(request).send().await?;
        Self::session_from(response, "anonymous sign in").await
    }

    async fn exchange_code(&self, auth_code: &str, code_verifier: &str) -> AuthResult<Session> {
        self.token(
            "pkce",
            json!({ "auth_code": auth_code, "code_verifier": code_verifier }),
            "code exchange",
        )
        .await
    }

    async fn verify_otp(&self, otp_type: OtpType, token_hash: &str) -> AuthResult<Session> {
        let request = self
            .http
            .post(self.endpoint("/verify"))
            .json(&json!({ "type": otp_type, "token_hash": token_hash }));
        let response = self.anon(request).send().await?;
        Self::session_from(response, "verify otp").await
    }

    async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        let request = self.http.post(self.endpoint("/logout"));
        let response = self.as_user(request, access_token).send().await?;
        Self::ensure_success(response, "sign out").await?;
        Ok(())
    }

    async fn recover(
        &self,
        email: &str,
        redirect_to: Option<&str>,
        code_challenge: Option<&str>,
    ) -> AuthResult<()> {
        let mut body = json!({ "email": email });
        if let Some(challenge) = code_challenge {
            body["code_challenge"] = json!(challenge);
            body["code_challenge_method"] = json!(PkcePair::method());
        }

        let mut builder = self.http.post(self.endpoint("/recover")).json(&body);
        if let Some(redirect_to) = redirect_to {
            builder = builder.query(&[("redirect_to", redirect_to)]);
        }

        let response = self.anon(builder).send().await?;
        Self::ensure_success(response, "recover").await?;
        Ok(())
    }

    fn authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
        code_challenge: &str,
    ) -> AuthResult<String> {
        let url = Url::parse_with_params(
            &self.endpoint("/authorize"),
            &[
                ("provider", provider.as_str()),
                ("redirect_to", redirect_to),
                ("code_challenge", code_challenge),
                ("code_challenge_method", PkcePair::method()),
            ],
        )?;
        Ok(url.into())
    }
}
