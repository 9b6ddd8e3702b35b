//! Subscription Use Cases

use std::sync::Arc;

use crate::application::config::BillingConfig;
use crate::application::customer::resolve_customer_id;
use crate::domain::entities::{BillingCaller, Page, Subscription};
use crate::domain::repository::{BillingProvider, CustomerDirectory};
use crate::error::{BillingError, BillingResult};

/// First page of the caller's subscriptions
pub struct ListSubscriptionsUseCase<D, B>
where
    D: CustomerDirectory,
    B: BillingProvider,
{
    directory: Arc<D>,
    provider: Arc<B>,
    config: Arc<BillingConfig>,
}

impl<D, B> ListSubscriptionsUseCase<D, B>
where
    D: CustomerDirectory + Send + Sync,
    B: BillingProvider + Send + Sync,
{
    pub fn new(directory: Arc<D>, provider: Arc<B>, config: Arc<BillingConfig>) -> Self {
        Self {
            directory,
            provider,
            config,
        }
    }

    pub async fn execute(&self, caller: &BillingCaller) -> BillingResult<Page<Subscription>> {
        let customer_id = resolve_customer_id(self.directory.as_ref(), caller).await?;
        let page = self
            .provider
            .list_subscriptions(&customer_id, self.config.per_page)
            .await?;

        tracing::debug!(count = page.items.len(), has_more = page.has_more, "Listed subscriptions");
        Ok(page)
    }
}

/// One subscription, only if it belongs to the caller
pub struct GetSubscriptionUseCase<D, B>
where
    D: CustomerDirectory,
    B: BillingProvider,
{
    directory: Arc<D>,
    provider: Arc<B>,
}

impl<D, B> GetSubscriptionUseCase<D, B>
where
    D: CustomerDirectory + Send + Sync,
    B: BillingProvider + Send + Sync,
{
    pub fn new(directory: Arc<D>, provider: Arc<B>) -> Self {
        Self {
            directory,
            provider,
        }
    }

    pub async fn execute(&self, caller: &BillingCaller, subscription_id: &str) -> BillingResult<Subscription> {
        let customer_id = resolve_customer_id(self.directory.as_ref(), caller).await?;

        match self.provider.get_subscription(subscription_id).await? {
            Some(subscription) if subscription.belongs_to(&customer_id) => Ok(subscription),
            _ => Err(BillingError::SubscriptionNotFound(subscription_id.to_string())),
        }
    }
}
