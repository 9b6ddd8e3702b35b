//! Billing Router

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::application::config::BillingConfig;
use crate::domain::repository::{BillingProvider, CustomerDirectory};
use crate::error::BillingResult;
use crate::infra::{PaddleClient, PostgrestCustomerDirectory};
use crate::presentation::handlers::{self, BillingAppState};

/// Create the Billing router over Paddle and the identity backend
///
/// Mount under `/api/billing`, inside the request pipeline (handlers read
/// the pipeline's `CurrentUser`).
pub fn billing_router(config: BillingConfig) -> BillingResult<Router> {
    let directory = PostgrestCustomerDirectory::new(&config)?;
    let provider = PaddleClient::new(&config)?;
    Ok(billing_router_generic(directory, provider, config))
}

/// Create a generic Billing router for any directory/provider implementation
pub fn billing_router_generic<D, B>(directory: D, provider: B, config: BillingConfig) -> Router
where
    D: CustomerDirectory + Send + Sync + 'static,
    B: BillingProvider + Send + Sync + 'static,
{
    let state = BillingAppState {
        directory: Arc::new(directory),
        provider: Arc::new(provider),
        config: Arc::new(config),
    };

    Router::new()
        .route("/subscriptions", get(handlers::list_subscriptions::<D, B>))
        .route("/subscriptions/{id}", get(handlers::get_subscription::<D, B>))
        .route("/transactions", get(handlers::list_transactions::<D, B>))
        .route("/frequencies", get(handlers::frequencies))
        .with_state(state)
}
