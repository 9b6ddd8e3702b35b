//! Infrastructure Layer
//!
//! External service integrations.

pub mod paddle;
pub mod postgrest;

pub use paddle::PaddleClient;
pub use postgrest::PostgrestCustomerDirectory;
