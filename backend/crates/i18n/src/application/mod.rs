//! Application Layer
//!
//! Routing configuration, locale detection and resolution.

pub mod config;
pub mod detect;
pub mod resolve;

// Re-exports
pub use config::RoutingConfig;
pub use detect::{match_accept_language, parse_accept_language, preferred_locale};
pub use resolve::{LocaleRequest, LocaleResolver, Resolution};
