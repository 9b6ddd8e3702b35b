//! HTTP Handlers
//!
//! Every flow ends in a redirect. GET callbacks answer 307 with an
//! absolute URL on this site; form posts answer 303 so the browser
//! follows with a GET. Cookie writes made by the auth client ride along
//! on the redirect.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Form;
use std::sync::Arc;

use i18n::ResolvedLocale;
use platform::cookie::CookieSet;

use crate::application::config::{AuthConfig, flash_link};
use crate::application::{
    AuthClient, AuthClientFactory, ConfirmOtpUseCase, ExchangeCodeUseCase, GuestSignInUseCase,
    OAuthSignInUseCase, ResetPasswordUseCase, SignInUseCase, SignOutUseCase, SignUpUseCase,
};
use crate::domain::entity::AuthOutcome;
use crate::domain::provider::IdentityProvider;
use crate::domain::value_object::OAuthProvider;
use crate::presentation::dto::{
    AuthPageView, CallbackQuery, ConfirmQuery, FieldView, FlashQuery, ForgotPasswordForm,
    LoginForm, OAuthForm, RegistrationForm,
};

/// Shared state for auth handlers
pub struct AuthAppState<P> {
    pub factory: AuthClientFactory<P>,
    pub config: Arc<AuthConfig>,
}

impl<P> Clone for AuthAppState<P> {
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
            config: self.config.clone(),
        }
    }
}

impl<P> AuthAppState<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    fn client(&self, headers: &HeaderMap) -> AuthClient<P> {
        self.factory
            .for_request(&CookieSet::from_request_headers(headers))
    }
}

/// Redirect carrying the client's cookie writes
fn redirect(status: StatusCode, location: &str, cookies: CookieSet) -> Response {
    let mut response = status.into_response();
    match HeaderValue::from_str(location) {
        Ok(value) => {
            response.headers_mut().insert(header::LOCATION, value);
        }
        Err(_) => {
            tracing::error!(location, "Redirect location is not a valid header value");
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        }
    }
    cookies.append_set_cookie_headers(response.headers_mut());
    response
}

/// 307 for link callbacks: target on success, error route otherwise
fn callback_redirect<P>(config: &AuthConfig, outcome: AuthOutcome, client: &mut AuthClient<P>) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let path = match &outcome {
        AuthOutcome::Success { redirect_to } => redirect_to.as_str(),
        AuthOutcome::Failure { .. } => config.error_route.as_str(),
    };
    redirect(
        StatusCode::TEMPORARY_REDIRECT,
        &config.site_link(path),
        client.take_cookie_writes(),
    )
}

/// 303 for form posts: target on success, back to `form_route` with the error otherwise
///
/// Site paths keep the locale prefix the form was posted under.
fn form_redirect<P>(
    form_route: &str,
    locale: &ResolvedLocale,
    outcome: AuthOutcome,
    client: &mut AuthClient<P>,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let location = match outcome {
        AuthOutcome::Success { redirect_to } => redirect_to,
        AuthOutcome::Failure { reason } => flash_link(form_route, "error", &reason),
    };
    redirect(StatusCode::SEE_OTHER, &locale.href(&location), client.take_cookie_writes())
}

// ============================================================================
// Callbacks
// ============================================================================

/// GET /auth/callback
pub async fn callback<P>(
    State(state): State<AuthAppState<P>>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let mut client = state.client(&headers);
    let outcome = ExchangeCodeUseCase::new(state.config.clone())
        .execute(&mut client, query.into())
        .await;
    callback_redirect(&state.config, outcome, &mut client)
}

/// GET /auth/confirm
pub async fn confirm<P>(
    State(state): State<AuthAppState<P>>,
    headers: HeaderMap,
    Query(query): Query<ConfirmQuery>,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let mut client = state.client(&headers);
    let outcome = ConfirmOtpUseCase::new(state.config.clone())
        .execute(&mut client, query.into())
        .await;
    callback_redirect(&state.config, outcome, &mut client)
}

// ============================================================================
// Forms
// ============================================================================

/// POST /auth/login
pub async fn login<P>(
    State(state): State<AuthAppState<P>>,
    headers: HeaderMap,
    locale: ResolvedLocale,
    Form(form): Form<LoginForm>,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let mut client = state.client(&headers);
    let outcome = SignInUseCase.execute(&mut client, form.into()).await;
    form_redirect(&state.config.login_route, &locale, outcome, &mut client)
}

/// POST /auth/registration
pub async fn register<P>(
    State(state): State<AuthAppState<P>>,
    headers: HeaderMap,
    locale: ResolvedLocale,
    Form(form): Form<RegistrationForm>,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let mut client = state.client(&headers);
    let outcome = SignUpUseCase::new(state.config.clone())
        .execute(&mut client, form.into())
        .await;
    // Registration failures are shown on the login page, like sign-in ones
    form_redirect(&state.config.login_route, &locale, outcome, &mut client)
}

/// POST /auth/oauth
pub async fn oauth<P>(
    State(state): State<AuthAppState<P>>,
    headers: HeaderMap,
    locale: ResolvedLocale,
    Form(form): Form<OAuthForm>,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let mut client = state.client(&headers);
    let outcome = OAuthSignInUseCase::new(state.config.clone()).execute(&mut client, &form.provider);
    form_redirect(&state.config.login_route, &locale, outcome, &mut client)
}

/// POST /auth/guest
pub async fn guest<P>(
    State(state): State<AuthAppState<P>>,
    headers: HeaderMap,
    locale: ResolvedLocale,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let mut client = state.client(&headers);
    let outcome = GuestSignInUseCase.execute(&mut client).await;
    form_redirect(&state.config.login_route, &locale, outcome, &mut client)
}

/// POST /auth/signout
pub async fn sign_out<P>(
    State(state): State<AuthAppState<P>>,
    headers: HeaderMap,
    locale: ResolvedLocale,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let mut client = state.client(&headers);
    let outcome = SignOutUseCase::new(state.config.clone())
        .execute(&mut client)
        .await;
    form_redirect(&state.config.login_route, &locale, outcome, &mut client)
}

/// POST /auth/forgot-password
pub async fn forgot_password<P>(
    State(state): State<AuthAppState<P>>,
    headers: HeaderMap,
    locale: ResolvedLocale,
    Form(form): Form<ForgotPasswordForm>,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let mut client = state.client(&headers);
    let outcome = ResetPasswordUseCase::new(state.config.clone())
        .execute(&mut client, form.email)
        .await;
    form_redirect(&state.config.forgot_password_route, &locale, outcome, &mut client)
}

// ============================================================================
// Pages
// ============================================================================

const LOGIN_FIELDS: [FieldView; 2] = [
    FieldView::new("email", "email", true),
    FieldView::new("password", "password", true),
];

const REGISTRATION_FIELDS: [FieldView; 7] = [
    FieldView::new("first_name", "text", true),
    FieldView::new("last_name", "text", true),
    FieldView::new("display_name", "text", false),
    FieldView::new("email", "email", true),
    FieldView::new("password", "password", true),
    FieldView::new("confirm_password", "password", true),
    FieldView::new("terms", "checkbox", true),
];

const FORGOT_PASSWORD_FIELDS: [FieldView; 1] = [FieldView::new("email", "email", true)];

fn page(
    name: &'static str,
    locale: &ResolvedLocale,
    action: Option<&'static str>,
    fields: &[FieldView],
    flash: FlashQuery,
) -> AuthPageView {
    AuthPageView {
        page: name,
        locale: locale.locale.to_string(),
        path: locale.localized_path.clone(),
        action,
        fields: fields.to_vec(),
        social_providers: Vec::new(),
        error: flash.error,
        message: flash.message,
    }
}

/// GET /auth/login
pub async fn login_page(locale: ResolvedLocale, Query(flash): Query<FlashQuery>) -> Json<AuthPageView> {
    let mut view = page("login", &locale, Some("/auth/login"), &LOGIN_FIELDS, flash);
    view.social_providers = OAuthProvider::ALL.to_vec();
    Json(view)
}

/// GET /auth/registration
pub async fn registration_page(
    locale: ResolvedLocale,
    Query(flash): Query<FlashQuery>,
) -> Json<AuthPageView> {
    let mut view = page(
        "registration",
        &locale,
        Some("/auth/registration"),
        &REGISTRATION_FIELDS,
        flash,
    );
    view.social_providers = OAuthProvider::ALL.to_vec();
    Json(view)
}

/// GET /auth/forgot-password
pub async fn forgot_password_page(
    locale: ResolvedLocale,
    Query(flash): Query<FlashQuery>,
) -> Json<AuthPageView> {
    Json(page(
        "forgot-password",
        &locale,
        Some("/auth/forgot-password"),
        &FORGOT_PASSWORD_FIELDS,
        flash,
    ))
}

/// GET /auth/error
pub async fn error_page(locale: ResolvedLocale) -> impl IntoResponse {
    let mut view = page("error", &locale, None, &[], FlashQuery::default());
    view.error = Some("There was an error processing your authentication request.".to_string());
    Json(view)
}
