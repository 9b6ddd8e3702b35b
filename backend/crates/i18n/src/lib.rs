//! Locale routing
//!
//! Layout:
//! - `domain/` - locales and the pathname table
//! - `application/` - configuration, detection, resolution
//! - `presentation/` - request extension extractor
//!
//! The default locale is served without a prefix (`/pricing`); other
//! locales are prefixed and use their own slugs (`/es/precios`).

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::RoutingConfig;
pub use application::resolve::{LocaleRequest, LocaleResolver, Resolution};
pub use domain::{Locale, PathnameTable, SUPPORTED_LOCALES};
pub use error::{I18nError, I18nResult};
pub use presentation::ResolvedLocale;
