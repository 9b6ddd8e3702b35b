//! Application Layer
//!
//! Use cases and application services.

pub mod config;
mod customer;
pub mod subscriptions;
pub mod transactions;

// Re-exports
pub use config::BillingConfig;
pub use subscriptions::{GetSubscriptionUseCase, ListSubscriptionsUseCase};
pub use transactions::ListTransactionsUseCase;
