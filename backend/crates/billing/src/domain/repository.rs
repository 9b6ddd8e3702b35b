//! Repository Traits
//!
//! Interfaces to the billing provider and the customer directory.
//! Implementations are in the infrastructure layer.

use crate::domain::entities::{Page, Subscription, Transaction};
use crate::error::BillingResult;

/// Maps an account to its billing customer
#[trait_variant::make(CustomerDirectory: Send)]
pub trait LocalCustomerDirectory {
    /// Customer id linked to `email`, read with the user's own token
    async fn find_customer_id(&self, email: &str, access_token: &str) -> BillingResult<Option<String>>;
}

/// Subscription and transaction reads
#[trait_variant::make(BillingProvider: Send)]
pub trait LocalBillingProvider {
    async fn list_subscriptions(&self, customer_id: &str, per_page: u32) -> BillingResult<Page<Subscription>>;

    /// `None` when the provider has no such subscription
    async fn get_subscription(&self, subscription_id: &str) -> BillingResult<Option<Subscription>>;

    async fn list_transactions(&self, customer_id: &str, per_page: u32) -> BillingResult<Page<Transaction>>;
}
