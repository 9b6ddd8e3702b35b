//! Entity Module

pub mod auth_change;
pub mod auth_outcome;
pub mod session;

pub use auth_change::{AuthChange, AuthEvent};
pub use auth_outcome::AuthOutcome;
pub use session::{Session, User};
