//! Domain Layer
//!
//! Locales and the pathname table. No I/O.

pub mod locale;
pub mod pathname;

// Re-exports
pub use locale::{Locale, SUPPORTED_LOCALES};
pub use pathname::PathnameTable;
