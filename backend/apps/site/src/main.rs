//! Site Server Entry Point
//!
//! Loads configuration, wires the identity provider, locale routing and
//! (optionally) billing, and serves everything behind the request
//! pipeline. Uses `anyhow` for startup errors; request-level errors use
//! the crates' own error types.

mod app;
mod config;
mod pages;
mod pipeline;

#[cfg(test)]
mod tests;

use anyhow::Context;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth::GoTrueClient;
use auth::session::AuthClientFactory;
use billing::billing_router;
use i18n::LocaleResolver;

use crate::config::SiteConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "site=info,auth=info,i18n=info,billing=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SiteConfig::from_env()?;
    tracing::info!(
        site_url = %config.auth.site_url,
        cookie_secure = config.auth.cookie_secure,
        "Configuration loaded"
    );

    let provider = GoTrueClient::new(&config.auth).context("Failed to build identity client")?;
    let factory = AuthClientFactory::new(Arc::new(provider), Arc::new(config.auth));
    let resolver = LocaleResolver::new(Arc::new(config.routing));

    let billing = match config.billing {
        Some(billing_config) => {
            tracing::info!(api_url = %billing_config.paddle_api_url, "Billing API enabled");
            Some(billing_router(billing_config).context("Failed to build billing client")?)
        }
        None => {
            tracing::warn!("PADDLE_API_KEY not set, billing API disabled");
            None
        }
    };

    let router = app::site_router(factory.clone(), resolver.clone(), billing);
    let service = app::with_pipeline(router, factory, resolver);

    // Start server
    let addr = config.bind_addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(service),
    )
    .await?;

    Ok(())
}
