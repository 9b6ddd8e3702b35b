//! Infrastructure Layer
//!
//! External service integrations.

pub mod gotrue;

pub use gotrue::GoTrueClient;
