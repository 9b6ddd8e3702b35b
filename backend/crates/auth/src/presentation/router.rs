//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::client::AuthClientFactory;
use crate::application::config::AuthConfig;
use crate::domain::provider::IdentityProvider;
use crate::infra::gotrue::GoTrueClient;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router over the hosted identity API
///
/// Mount under `/auth`.
pub fn auth_router(provider: GoTrueClient, config: AuthConfig) -> Router {
    let config = Arc::new(config);
    let factory = AuthClientFactory::new(Arc::new(provider), config.clone());
    auth_router_generic(factory, config)
}

/// Create a generic Auth router for any identity provider implementation
pub fn auth_router_generic<P>(factory: AuthClientFactory<P>, config: Arc<AuthConfig>) -> Router
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let state = AuthAppState { factory, config };

    Router::new()
        .route("/callback", get(handlers::callback::<P>))
        .route("/confirm", get(handlers::confirm::<P>))
        .route(
            "/login",
            get(handlers::login_page).post(handlers::login::<P>),
        )
        .route(
            "/registration",
            get(handlers::registration_page).post(handlers::register::<P>),
        )
        .route("/oauth", post(handlers::oauth::<P>))
        .route("/guest", post(handlers::guest::<P>))
        .route("/signout", post(handlers::sign_out::<P>))
        .route(
            "/forgot-password",
            get(handlers::forgot_password_page).post(handlers::forgot_password::<P>),
        )
        .route("/error", get(handlers::error_page))
        .with_state(state)
}
