//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::sync::Arc;

use auth::middleware::CurrentUser;

use crate::application::config::BillingConfig;
use crate::application::{GetSubscriptionUseCase, ListSubscriptionsUseCase, ListTransactionsUseCase};
use crate::domain::entities::{BillingCaller, Page};
use crate::domain::repository::{BillingProvider, CustomerDirectory};
use crate::domain::value_objects::{BILLING_FREQUENCIES, BillingFrequency};
use crate::error::{BillingError, BillingResult};
use crate::presentation::dto::{ListResponse, SubscriptionDetailResponse};

/// Shared state for billing handlers
pub struct BillingAppState<D, B> {
    pub directory: Arc<D>,
    pub provider: Arc<B>,
    pub config: Arc<BillingConfig>,
}

impl<D, B> Clone for BillingAppState<D, B> {
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            provider: self.provider.clone(),
            config: self.config.clone(),
        }
    }
}

/// Caller from the pipeline's session check
fn caller(current: CurrentUser) -> BillingResult<BillingCaller> {
    match (current.user, current.access_token) {
        (Some(user), Some(access_token)) => Ok(BillingCaller {
            email: user.email.filter(|e| !e.is_empty()),
            access_token,
        }),
        _ => Err(BillingError::Unauthenticated),
    }
}

fn list_response<T: Serialize>(result: BillingResult<Page<T>>) -> Response {
    match result {
        Ok(page) => Json(ListResponse::from(page)).into_response(),
        Err(err) => {
            err.log();
            (err.status_code(), Json(ListResponse::<T>::failed(err.public_message()))).into_response()
        }
    }
}

// ============================================================================
// Subscriptions
// ============================================================================

/// GET /api/billing/subscriptions
pub async fn list_subscriptions<D, B>(
    State(state): State<BillingAppState<D, B>>,
    current: CurrentUser,
) -> Response
where
    D: CustomerDirectory + Send + Sync + 'static,
    B: BillingProvider + Send + Sync + 'static,
{
    let result = match caller(current) {
        Ok(caller) => {
            ListSubscriptionsUseCase::new(state.directory, state.provider, state.config)
                .execute(&caller)
                .await
        }
        Err(err) => Err(err),
    };
    list_response(result)
}

/// GET /api/billing/subscriptions/{id}
pub async fn get_subscription<D, B>(
    State(state): State<BillingAppState<D, B>>,
    current: CurrentUser,
    Path(subscription_id): Path<String>,
) -> BillingResult<Json<SubscriptionDetailResponse>>
where
    D: CustomerDirectory + Send + Sync + 'static,
    B: BillingProvider + Send + Sync + 'static,
{
    let caller = caller(current)?;
    let subscription = GetSubscriptionUseCase::new(state.directory, state.provider)
        .execute(&caller, &subscription_id)
        .await?;

    Ok(Json(SubscriptionDetailResponse::found(subscription)))
}

// ============================================================================
// Transactions
// ============================================================================

/// GET /api/billing/transactions
pub async fn list_transactions<D, B>(
    State(state): State<BillingAppState<D, B>>,
    current: CurrentUser,
) -> Response
where
    D: CustomerDirectory + Send + Sync + 'static,
    B: BillingProvider + Send + Sync + 'static,
{
    let result = match caller(current) {
        Ok(caller) => {
            ListTransactionsUseCase::new(state.directory, state.provider, state.config)
                .execute(&caller)
                .await
        }
        Err(err) => Err(err),
    };
    list_response(result)
}

// ============================================================================
// Frequencies
// ============================================================================

/// GET /api/billing/frequencies
pub async fn frequencies() -> Json<[BillingFrequency; 2]> {
    Json(BILLING_FREQUENCIES)
}
