//! Application assembly

use axum::extract::Request;
use axum::response::Response;
use axum::{Router, middleware};
use std::convert::Infallible;
use std::sync::Arc;
use tower::{Layer, Service};
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use auth::domain::provider::IdentityProvider;
use auth::router::auth_router_generic;
use auth::session::{AuthClientFactory, SessionRefresher};
use i18n::LocaleResolver;
use kernel::error::app_error::AppError;

use crate::pages::pages_router;
use crate::pipeline::{Pipeline, request_pipeline};

async fn not_found() -> AppError {
    AppError::not_found("Page not found").with_action("Check the address or go back to the home page")
}

/// Routes of the site, before the pipeline is put in front
pub fn site_router<P>(
    factory: AuthClientFactory<P>,
    resolver: LocaleResolver,
    billing: Option<Router>,
) -> Router
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let auth_config: Arc<AuthConfig> = factory.config().clone();

    let mut router = Router::new()
        .merge(pages_router(resolver, auth_config.clone()))
        .nest("/auth", auth_router_generic(factory, auth_config));

    if let Some(billing) = billing {
        router = router.nest("/api/billing", billing);
    }

    router
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
}

/// Put the request pipeline in front of `router`
///
/// The pipeline wraps the router as a whole, not as a router layer, so
/// its URI rewrite is seen by routing.
pub fn with_pipeline<P>(
    router: Router,
    factory: AuthClientFactory<P>,
    resolver: LocaleResolver,
) -> impl Service<Request, Response = Response, Error = Infallible, Future: Send> + Clone + Send + 'static
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let pipeline = Arc::new(Pipeline::new(resolver, SessionRefresher::new(factory)));
    middleware::from_fn_with_state(pipeline, request_pipeline::<P>).layer(router)
}
