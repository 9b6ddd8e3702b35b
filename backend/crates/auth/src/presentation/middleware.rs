//! Auth Middleware
//!
//! The request pipeline validates the session once and stores the result
//! as a [`CurrentUser`] request extension. Handlers read it from there
//! instead of asking the provider again.

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::convert::Infallible;
use std::sync::Arc;

use i18n::ResolvedLocale;

use crate::application::config::AuthConfig;
use crate::domain::entity::User;

/// Session facts for the current request
#[derive(Clone, Default)]
pub struct CurrentUser {
    pub user: Option<User>,
    /// Bearer token for calls made on the user's behalf
    pub access_token: Option<String>,
}

impl std::fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUser")
            .field("user", &self.user.as_ref().map(|u| &u.id))
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl CurrentUser {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Anonymous when the pipeline did not run
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Middleware that sends anonymous visitors to the login page
pub async fn require_user(
    State(config): State<Arc<AuthConfig>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let signed_in = req
        .extensions()
        .get::<CurrentUser>()
        .is_some_and(CurrentUser::is_authenticated);

    if !signed_in {
        let login = match req.extensions().get::<ResolvedLocale>() {
            Some(locale) => locale.href(&config.login_route),
            None => config.login_route.clone(),
        };
        tracing::debug!(path = %req.uri().path(), login = %login, "Anonymous visitor sent to login");
        return (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, login)]).into_response();
    }

    next.run(req).await
}
