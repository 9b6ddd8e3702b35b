//! Application Layer
//!
//! Use cases and application services.

pub mod auth_state;
pub mod callback;
pub mod client;
pub mod config;
pub mod event_bus;
pub mod refresh_session;
pub mod reset_password;
pub mod session_store;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

// Re-exports
pub use auth_state::{
    AuthSnapshot, AuthStateHandle, AuthStateObserver, AuthStateSource, LiveSession,
    LocalAuthStateSource,
};
pub use callback::{ConfirmOtpInput, ConfirmOtpUseCase, ExchangeCodeInput, ExchangeCodeUseCase};
pub use client::{AuthClient, AuthClientFactory, SignUpParams};
pub use config::AuthConfig;
pub use event_bus::AuthEventBus;
pub use refresh_session::{RefreshOutcome, SessionRefresher};
pub use reset_password::ResetPasswordUseCase;
pub use session_store::SessionCookieStore;
pub use sign_in::{GuestSignInUseCase, OAuthSignInUseCase, SignInInput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
