//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations of the site backend:
//! - Cookie sets used as request and response jars
//! - Client identification from request headers
//! - PKCE and encoding helpers (SHA-256, Base64url)

pub mod client;
pub mod cookie;
pub mod crypto;
