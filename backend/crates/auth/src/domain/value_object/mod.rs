//! Value Object Module

pub mod email;
pub mod oauth_provider;
pub mod otp_type;
pub mod password;
pub mod redirect_target;

pub use email::Email;
pub use oauth_provider::OAuthProvider;
pub use otp_type::OtpType;
pub use password::Password;
pub use redirect_target::RedirectTarget;
