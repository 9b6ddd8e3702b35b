//! Domain Layer
//!
//! Billing entities, value objects and repository traits.

pub mod entities;
pub mod repository;
pub mod value_objects;

// Re-exports
pub use entities::{BillingCaller, Page, Subscription, Transaction};
pub use repository::{BillingProvider, CustomerDirectory, LocalBillingProvider, LocalCustomerDirectory};
pub use value_objects::{BILLING_FREQUENCIES, BillingCycle, BillingFrequency};
