//! Shared Kernel - Vocabulary shared by every crate of the site backend
//!
//! - Unified error type ([`error::app_error::AppError`]) and its HTTP mapping
//! - Error classification ([`error::kind::ErrorKind`])
//! - Typed identifiers ([`id::Id`])
//!
//! Only things with one meaning across the locale, auth and billing
//! crates belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
