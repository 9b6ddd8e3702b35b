//! Page routes
//!
//! Marketing pages are served as JSON descriptors: the canonical route,
//! the locale it was reached in, links to the same page in every locale
//! and the signed-in user, if any. The frontend renders the markup.

use axum::extract::State;
use axum::{Json, Router, middleware, routing::get};
use serde::Serialize;
use std::sync::Arc;

use auth::AuthConfig;
use auth::middleware::{CurrentUser, require_user};
use billing::domain::value_objects::{BILLING_FREQUENCIES, BillingFrequency};
use i18n::{Locale, LocaleResolver, ResolvedLocale};
use kernel::id::UserId;

#[derive(Debug, Clone, Serialize)]
pub struct AlternateLink {
    pub locale: Locale,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub route: String,
    pub locale: Locale,
    pub path: String,
    pub alternates: Vec<AlternateLink>,
    pub user: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_frequencies: Option<[BillingFrequency; 2]>,
}

fn page_view(resolver: &LocaleResolver, locale: &ResolvedLocale, current: &CurrentUser) -> PageView {
    PageView {
        route: locale.canonical_path.clone(),
        locale: locale.locale,
        path: locale.localized_path.clone(),
        alternates: resolver
            .alternates(&locale.canonical_path)
            .into_iter()
            .map(|(locale, href)| AlternateLink { locale, href })
            .collect(),
        user: current.user.as_ref().map(|user| UserSummary {
            id: user.id,
            email: user.email.clone(),
            is_anonymous: user.is_anonymous,
        }),
        billing_frequencies: None,
    }
}

/// GET /, /about, /privacy-policy
async fn marketing_page(
    State(resolver): State<LocaleResolver>,
    locale: ResolvedLocale,
    current: CurrentUser,
) -> Json<PageView> {
    Json(page_view(&resolver, &locale, &current))
}

/// GET /pricing
async fn pricing_page(
    State(resolver): State<LocaleResolver>,
    locale: ResolvedLocale,
    current: CurrentUser,
) -> Json<PageView> {
    let mut view = page_view(&resolver, &locale, &current);
    view.billing_frequencies = Some(BILLING_FREQUENCIES);
    Json(view)
}

/// GET /dashboard, signed-in visitors only
async fn dashboard_page(
    State(resolver): State<LocaleResolver>,
    locale: ResolvedLocale,
    current: CurrentUser,
) -> Json<PageView> {
    Json(page_view(&resolver, &locale, &current))
}

pub fn pages_router(resolver: LocaleResolver, auth_config: Arc<AuthConfig>) -> Router {
    let gated = Router::new()
        .route("/dashboard", get(dashboard_page))
        .route_layer(middleware::from_fn_with_state(auth_config, require_user));

    Router::new()
        .route("/", get(marketing_page))
        .route("/about", get(marketing_page))
        .route("/privacy-policy", get(marketing_page))
        .route("/pricing", get(pricing_page))
        .merge(gated)
        .with_state(resolver)
}
