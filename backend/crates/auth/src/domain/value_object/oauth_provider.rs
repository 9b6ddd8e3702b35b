//! OAuth Provider Value Object

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AuthError;

/// Social login providers offered on the login page
///
/// Closed set: anything else is rejected at the form boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    #[display("google")]
    Google,
    #[display("facebook")]
    Facebook,
    #[display("apple")]
    Apple,
    #[display("github")]
    Github,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 4] = [
        OAuthProvider::Google,
        OAuthProvider::Facebook,
        OAuthProvider::Apple,
        OAuthProvider::Github,
    ];

    /// Provider name as the identity backend expects it
    pub const fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Facebook => "facebook",
            OAuthProvider::Apple => "apple",
            OAuthProvider::Github => "github",
        }
    }
}

impl FromStr for OAuthProvider {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| AuthError::UnsupportedProvider(s.to_string()))
    }
}
