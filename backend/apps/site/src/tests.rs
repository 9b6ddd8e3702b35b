//! End-to-end tests: the whole site behind the request pipeline

use axum::body::Body;
use axum::extract::Request;
use axum::http::{StatusCode, header};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

use auth::AuthConfig;
use auth::domain::provider::{IdentityProvider, SignUpReply, SignUpRequest};
use auth::middleware::CurrentUser;
use auth::models::{OAuthProvider, OtpType, Session, User};
use auth::session::{AuthClientFactory, SessionCookieStore};
use auth::{AuthError, AuthResult};
use i18n::{LocaleResolver, RoutingConfig};
use platform::cookie::CookieSet;

use crate::app::{site_router, with_pipeline};

/// Far enough in the future that no refresh is due
const LATER: i64 = 4_102_444_800;

fn user() -> User {
    serde_json::from_value(json!({
        "id": "6a1f4c2e-8f1d-4d9e-9c55-3f0b8f7b2a10",
        "aud": "authenticated",
        "email": "ana@example.com"
    }))
    .unwrap()
}

fn session(access_token: &str, expires_at: i64) -> Session {
    Session {
        access_token: access_token.to_string(),
        refresh_token: format!("refresh-{access_token}"),
        token_type: "bearer".to_string(),
        expires_in: 3600,
        expires_at: Some(expires_at),
        user: Some(user()),
    }
}

fn rejected() -> AuthError {
    AuthError::Provider {
        status: 401,
        code: Some("bad_jwt".to_string()),
        message: "invalid JWT".to_string(),
    }
}

/// Accepts the access tokens `valid` and `refreshed`
#[derive(Default)]
struct StubProvider {
    calls: AtomicUsize,
}

impl StubProvider {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl IdentityProvider for StubProvider {
    async fn get_user(&self, access_token: &str) -> AuthResult<User> {
        self.count();
        match access_token {
            "valid" | "refreshed" => Ok(user()),
            _ => Err(rejected()),
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> AuthResult<Session> {
        self.count();
        match refresh_token {
            "refresh-expired" => Ok(session("refreshed", LATER)),
            _ => Err(rejected()),
        }
    }

    async fn sign_in_with_password(&self, _email: &str, _password: &str) -> AuthResult<Session> {
        self.count();
        Ok(session("valid", LATER))
    }

    async fn sign_up(&self, _request: &SignUpRequest) -> AuthResult<SignUpReply> {
        self.count();
        Err(rejected())
    }

    async fn sign_in_anonymously(&self) -> AuthResult<Session> {
        self.count();
        Err(rejected())
    }

    async fn exchange_code(&self, _auth_code: &str, _code_verifier: &str) -> AuthResult<Session> {
        self.count();
        Err(rejected())
    }

    async fn verify_otp(&self, _otp_type: OtpType, _token_hash: &str) -> AuthResult<Session> {
        self.count();
        Err(rejected())
    }

    async fn sign_out(&self, _access_token: &str) -> AuthResult<()> {
        self.count();
        Ok(())
    }

    async fn recover(
        &self,
        _email: &str,
        _redirect_to: Option<&str>,
        _code_challenge: Option<&str>,
    ) -> AuthResult<()> {
        self.count();
        Ok(())
    }

    fn authorize_url(
        &self,
        provider: OAuthProvider,
        _redirect_to: &str,
        _code_challenge: &str,
    ) -> AuthResult<String> {
        Ok(format!("https://idp.example/authorize?provider={}", provider.as_str()))
    }
}

/// Stand-in for the billing API: echoes what the pipeline found
async fn whoami(current: CurrentUser) -> Json<Value> {
    Json(json!({ "email": current.user.and_then(|u| u.email) }))
}

struct Site {
    provider: Arc<StubProvider>,
    store: SessionCookieStore,
    router: Router,
    factory: AuthClientFactory<StubProvider>,
    resolver: LocaleResolver,
}

impl Site {
    fn new() -> Self {
        let provider = Arc::new(StubProvider::default());
        let config = Arc::new(AuthConfig::development());
        let factory = AuthClientFactory::new(provider.clone(), config.clone());
        let resolver = LocaleResolver::new(Arc::new(RoutingConfig::development()));
        let api = Router::new().route("/whoami", get(whoami));

        Self {
            store: SessionCookieStore::new(&config),
            router: site_router(factory.clone(), resolver.clone(), Some(api)),
            provider,
            factory,
            resolver,
        }
    }

    /// Cookie header of a browser holding `session`
    fn cookie_header(&self, session: &Session) -> String {
        let jar: CookieSet = self.store.store(&CookieSet::new(), session).unwrap();
        jar.to_request_header().unwrap().to_str().unwrap().to_string()
    }

    async fn send(&self, req: Request) -> Response {
        with_pipeline(self.router.clone(), self.factory.clone(), self.resolver.clone())
            .oneshot(req)
            .await
            .unwrap()
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Locale
// ============================================================================

#[tokio::test]
async fn test_localized_slug_is_served_from_canonical_route() {
    let site = Site::new();

    let response = site.get("/es/precios").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response).iter().any(|c| c.starts_with("locale=es")));
    let body = json_body(response).await;
    assert_eq!(body["route"], "/pricing");
    assert_eq!(body["locale"], "es");
    assert_eq!(body["path"], "/es/precios");
    assert_eq!(body["alternates"][0], json!({"locale": "en", "href": "/pricing"}));
    assert_eq!(body["billingFrequencies"][1]["discount"], 20);
    assert_eq!(body["user"], Value::Null);
}

#[tokio::test]
async fn test_default_locale_prefix_redirects() {
    let site = Site::new();

    let response = site.get("/en/pricing?ref=nav").await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/pricing?ref=nav");
}

#[tokio::test]
async fn test_detected_locale_redirect_sets_cookie() {
    let site = Site::new();
    let req = Request::builder()
        .uri("/about")
        .header(header::ACCEPT_LANGUAGE, "es-ES,es;q=0.9,en;q=0.5")
        .body(Body::empty())
        .unwrap();

    let response = site.send(req).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/es/acerca-de");
    assert!(set_cookies(&response).iter().any(|c| c.starts_with("locale=es")));
}

#[tokio::test]
async fn test_privacy_policy_keeps_its_slug_in_every_locale() {
    let site = Site::new();

    let response = site.get("/es/privacy-policy").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["route"], "/privacy-policy");
    assert_eq!(body["locale"], "es");
    assert_eq!(body["alternates"][0], json!({"locale": "en", "href": "/privacy-policy"}));
}

#[tokio::test]
async fn test_auth_pages_under_locale_prefix() {
    let site = Site::new();

    let response = site.get("/es/auth/login").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["page"], "login");
    assert_eq!(body["locale"], "es");
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_valid_session_reaches_handlers() {
    let site = Site::new();
    let req = Request::builder()
        .uri("/dashboard")
        .header(header::COOKIE, site.cookie_header(&session("valid", LATER)))
        .body(Body::empty())
        .unwrap();

    let response = site.send(req).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(site.provider.calls(), 1);
    let body = json_body(response).await;
    assert_eq!(body["user"]["email"], "ana@example.com");
}

#[tokio::test]
async fn test_anonymous_dashboard_redirects_to_login() {
    let site = Site::new();

    let response = site.get("/dashboard").await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/auth/login");
    assert_eq!(site.provider.calls(), 0);
}

#[tokio::test]
async fn test_spanish_dashboard_redirects_to_spanish_login() {
    let site = Site::new();

    let response = site.get("/es/dashboard").await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/es/auth/login");
}

#[tokio::test]
async fn test_form_errors_return_under_locale_prefix() {
    let site = Site::new();
    let req = Request::builder()
        .method("POST")
        .uri("/es/auth/oauth")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("provider=myspace"))
        .unwrap();

    let response = site.send(req).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/es/auth/login?error=Unsupported+OAuth+provider%3A+myspace"
    );
}

#[tokio::test]
async fn test_expiring_session_is_refreshed_for_handler_and_browser() {
    let site = Site::new();
    let req = Request::builder()
        .uri("/api/billing/whoami")
        .header(header::COOKIE, site.cookie_header(&session("expired", 0)))
        .body(Body::empty())
        .unwrap();

    let response = site.send(req).await;

    assert_eq!(response.status(), StatusCode::OK);
    let key = site.store.key().to_string();
    assert!(set_cookies(&response).iter().any(|c| c.starts_with(&key)));
    assert_eq!(json_body(response).await["email"], "ana@example.com");
    // One refresh, one user check
    assert_eq!(site.provider.calls(), 2);
}

#[tokio::test]
async fn test_rejected_session_is_cleared() {
    let site = Site::new();
    let req = Request::builder()
        .uri("/")
        .header(header::COOKIE, site.cookie_header(&session("revoked", LATER)))
        .body(Body::empty())
        .unwrap();

    let response = site.send(req).await;

    assert_eq!(response.status(), StatusCode::OK);
    let key = site.store.key().to_string();
    assert!(
        set_cookies(&response)
            .iter()
            .any(|c| c.starts_with(&format!("{key}=")) && c.contains("Max-Age=0"))
    );
}

#[tokio::test]
async fn test_api_paths_skip_locale_but_get_session() {
    let site = Site::new();
    let req = Request::builder()
        .uri("/api/billing/whoami")
        .header(header::ACCEPT_LANGUAGE, "es")
        .header(header::COOKIE, site.cookie_header(&session("valid", LATER)))
        .body(Body::empty())
        .unwrap();

    let response = site.send(req).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response).iter().all(|c| !c.starts_with("locale=")));
    assert_eq!(json_body(response).await["email"], "ana@example.com");
}

#[tokio::test]
async fn test_static_assets_bypass_pipeline() {
    let site = Site::new();
    let req = Request::builder()
        .uri("/static/app.css")
        .header(header::ACCEPT_LANGUAGE, "es")
        .header(header::COOKIE, site.cookie_header(&session("expired", 0)))
        .body(Body::empty())
        .unwrap();

    let response = site.send(req).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(set_cookies(&response).is_empty());
    assert_eq!(site.provider.calls(), 0);
}

#[tokio::test]
async fn test_login_sets_session_cookies() {
    let site = Site::new();
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("email=ana%40example.com&password=password1"))
        .unwrap();

    let response = site.send(req).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let key = site.store.key().to_string();
    assert!(set_cookies(&response).iter().any(|c| c.starts_with(&key)));
}

/// Last `Set-Cookie` a browser would apply for `name`
fn last_write<'a>(cookies: &'a [String], name: &str) -> Option<&'a String> {
    let prefix = format!("{name}=");
    cookies.iter().rev().find(|c| c.starts_with(&prefix))
}

#[tokio::test]
async fn test_sign_out_with_expiring_session_stays_signed_out() {
    let site = Site::new();
    let req = Request::builder()
        .method("POST")
        .uri("/auth/signout")
        .header(header::COOKIE, site.cookie_header(&session("expired", 0)))
        .body(Body::empty())
        .unwrap();

    let response = site.send(req).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookies = set_cookies(&response);
    let key = site.store.key().to_string();
    let written: Vec<_> = cookies.iter().filter(|c| c.starts_with(&format!("{key}="))).collect();
    assert_eq!(written.len(), 1);
    assert!(last_write(&cookies, &key).unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn test_login_over_revoked_cookie_keeps_new_session() {
    let site = Site::new();
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, site.cookie_header(&session("revoked", LATER)))
        .body(Body::from("email=ana%40example.com&password=password1"))
        .unwrap();

    let response = site.send(req).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookies = set_cookies(&response);
    let key = site.store.key().to_string();
    let session_cookie = last_write(&cookies, &key).unwrap();
    assert!(session_cookie.starts_with(&format!("{key}=base64-")));
    assert!(!session_cookie.contains("Max-Age=0"));
}
