//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Sessions, users, value objects, identity provider trait
//! - `application/` - Per-request auth client, session refresher, use cases
//! - `infra/` - GoTrue REST client
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Email + password, social (OAuth PKCE) and guest sign-in
//! - Email link callbacks (code exchange and token hash verification)
//! - Registration with confirmation email, password reset, sign-out
//! - Session refresh once per request, mirrored into request and response cookies
//! - Auth state observer for long-lived consumers
//!
//! ## Session Model
//! - The identity provider owns sessions; this service only carries them
//! - Tokens live in `sb-<project-ref>-auth-token` cookies, chunked when large
//! - A new auth client is built for every request; nothing holds cookies
//!   across requests

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::gotrue::GoTrueClient;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod session {
    pub use crate::application::client::{AuthClient, AuthClientFactory};
    pub use crate::application::event_bus::AuthEventBus;
    pub use crate::application::refresh_session::{RefreshOutcome, SessionRefresher};
    pub use crate::application::session_store::SessionCookieStore;
}

pub mod state {
    pub use crate::application::auth_state::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
