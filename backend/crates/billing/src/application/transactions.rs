//! Transaction Use Case

use std::sync::Arc;

use crate::application::config::BillingConfig;
use crate::application::customer::resolve_customer_id;
use crate::domain::entities::{BillingCaller, Page, Transaction};
use crate::domain::repository::{BillingProvider, CustomerDirectory};
use crate::error::BillingResult;

/// First page of the caller's transactions
pub struct ListTransactionsUseCase<D, B>
where
    D: CustomerDirectory,
    B: BillingProvider,
{
    directory: Arc<D>,
    provider: Arc<B>,
    config: Arc<BillingConfig>,
}

impl<D, B> ListTransactionsUseCase<D, B>
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

    pub async fn execute(&self, caller: &BillingCaller) -> BillingResult<Page<Transaction>> {
        let customer_id = resolve_customer_id(self.directory.as_ref(), caller).await?;
        self.provider
            .list_transactions(&customer_id, self.config.per_page)
            .await
    }
}
