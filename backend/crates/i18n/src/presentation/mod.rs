//! Presentation Layer
//!
//! Axum-facing types.

pub mod extract;

pub use extract::ResolvedLocale;
