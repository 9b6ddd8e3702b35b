//! Domain Layer
//!
//! Contains entities, value objects, and the identity provider trait.

pub mod entity;
pub mod provider;
pub mod value_object;

// Re-exports
pub use entity::{AuthChange, AuthEvent, AuthOutcome, Session, User};
pub use provider::{IdentityProvider, LocalIdentityProvider, SignUpReply, SignUpRequest};
