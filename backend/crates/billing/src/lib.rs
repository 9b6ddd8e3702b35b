//! Billing Backend Module
//!
//! Read-only view of the signed-in user's Paddle subscriptions and
//! transactions. The user's billing customer id is looked up in the
//! identity backend's `customers` table.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, billing frequencies, repository traits
//! - `application/` - Use cases
//! - `infra/` - Paddle and customer directory REST clients
//! - `presentation/` - HTTP handlers, DTOs, router

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::BillingConfig;
pub use domain::value_objects::BILLING_FREQUENCIES;
pub use error::{BillingError, BillingResult};
pub use presentation::router::{billing_router, billing_router_generic};
