//! Request pipeline
//!
//! Runs in front of routing for every request that is not a static asset:
//! 1. resolve the locale, rewriting the URI to the canonical route (or
//!    preparing a locale redirect),
//! 2. validate and refresh the session once, so handlers read the result
//!    from request extensions,
//! 3. run the router (or answer the redirect) and attach every cookie the
//!    first two steps wrote.

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderValue, Method, StatusCode, Uri, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use std::sync::Arc;

use auth::middleware::CurrentUser;
use auth::session::SessionRefresher;
use auth::domain::provider::IdentityProvider;
use i18n::{LocaleRequest, LocaleResolver, Resolution, ResolvedLocale, RoutingConfig};
use platform::client::{extract_accept_language, extract_client_ip, extract_user_agent};
use platform::cookie::{Cookie, CookieOptions, CookieSet, SameSite};

/// Paths the pipeline never touches
const EXCLUDED_PREFIXES: [&str; 3] = ["/static/", "/assets/", "/favicon.ico"];
const EXCLUDED_EXTENSIONS: [&str; 9] = ["svg", "png", "jpg", "jpeg", "gif", "webp", "ico", "css", "js"];

/// Paths that skip locale handling but still get a session
const LOCALE_BYPASS_PREFIXES: [&str; 1] = ["/api"];

pub fn is_excluded(path: &str) -> bool {
    if EXCLUDED_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return true;
    }

    let last = path.rsplit('/').next().unwrap_or("");
    last.rsplit_once('.')
        .is_some_and(|(_, ext)| EXCLUDED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn bypasses_locale(path: &str) -> bool {
    LOCALE_BYPASS_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
}

pub struct Pipeline<P> {
    resolver: LocaleResolver,
    refresher: SessionRefresher<P>,
    locale_cookie_name: String,
    locale_cookie: CookieOptions,
}

impl<P> Pipeline<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    pub fn new(resolver: LocaleResolver, refresher: SessionRefresher<P>) -> Self {
        let routing: &RoutingConfig = resolver.config();
        let locale_cookie_name = routing.cookie_name.clone();
        let locale_cookie = CookieOptions {
            path: "/".to_string(),
            domain: None,
            secure: routing.cookie_secure,
            http_only: false,
            same_site: SameSite::Lax,
            max_age_secs: Some(routing.cookie_max_age_secs),
        };

        Self {
            locale_cookie_name,
            locale_cookie,
            resolver,
            refresher,
        }
    }

    fn resolve_locale(&self, req: &Request, request_jar: &CookieSet) -> Resolution {
        let uri = req.uri();
        self.resolver.resolve(&LocaleRequest {
            path: uri.path(),
            query: uri.query(),
            is_navigation: matches!(*req.method(), Method::GET | Method::HEAD),
            cookie_locale: request_jar.value(&self.locale_cookie_name),
            accept_language: extract_accept_language(req.headers()),
        })
    }

    fn locale_cookie(&self, resolution: &Resolution) -> Cookie<'static> {
        self.locale_cookie
            .build(self.locale_cookie_name.clone(), resolution.locale.as_str())
    }
}

/// The pipeline middleware; wrap the whole router with it
pub async fn request_pipeline<P>(
    State(pipeline): State<Arc<Pipeline<P>>>,
    mut req: Request,
    next: Next,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let path = req.uri().path().to_string();
    if is_excluded(&path) {
        return next.run(req).await;
    }

    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    tracing::debug!(
        method = %req.method(),
        path = %path,
        client_ip = ?extract_client_ip(req.headers(), direct_ip),
        user_agent = extract_user_agent(req.headers()).unwrap_or("-"),
        "Pipeline start"
    );

    let mut request_jar = CookieSet::from_request_headers(req.headers());
    let mut response_jar = CookieSet::new();
    let mut redirect = None;

    // Locale
    if !bypasses_locale(&path) {
        let resolution = pipeline.resolve_locale(&req, &request_jar);
        if resolution.persist_locale {
            response_jar.set(pipeline.locale_cookie(&resolution));
        }

        match &resolution.redirect {
            Some(target) => redirect = Some(target.clone()),
            None => {
                if resolution.canonical_path != path {
                    rewrite_path(&mut req, &resolution.canonical_path);
                }
                req.extensions_mut().insert(ResolvedLocale::from(&resolution));
            }
        }
    }

    // Session
    let outcome = pipeline
        .refresher
        .update_session(&mut request_jar, Some(response_jar))
        .await;
    request_jar.write_request_headers(req.headers_mut());
    req.extensions_mut().insert(CurrentUser {
        user: outcome.user,
        access_token: outcome.access_token,
    });

    let mut response = match redirect {
        Some(location) => locale_redirect(&location),
        None => next.run(req).await,
    };
    // A handler that rewrote the session (sign-in, sign-out) saw the
    // refreshed jar, so its own writes supersede the refresher's
    outcome
        .response_cookies
        .append_unset_cookie_headers(response.headers_mut());
    response
}

/// Point the request at `path`, keeping the query string
fn rewrite_path(req: &mut Request, path: &str) {
    let target = match req.uri().query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    let mut parts = req.uri().clone().into_parts();
    match target.parse() {
        Ok(path_and_query) => {
            parts.path_and_query = Some(path_and_query);
            match Uri::from_parts(parts) {
                Ok(uri) => *req.uri_mut() = uri,
                Err(err) => tracing::warn!(error = %err, path, "Could not rewrite request URI"),
            }
        }
        Err(err) => tracing::warn!(error = %err, path, "Could not rewrite request URI"),
    }
}

fn locale_redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::error!(location, "Locale redirect target is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
