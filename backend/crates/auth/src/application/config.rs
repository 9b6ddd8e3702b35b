//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;
use url::Url;

use platform::cookie::{CookieOptions, SameSite};

use crate::error::{AuthError, AuthResult};

/// Session cookies outlive the refresh token on purpose (400 days, the
/// browser maximum); the provider decides when the session is over.
const SESSION_COOKIE_MAX_AGE_SECS: i64 = 400 * 24 * 3600;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Public origin of this site, no trailing slash
    pub site_url: String,
    /// Identity backend project URL, no trailing slash
    pub supabase_url: String,
    /// Public (anon) API key
    pub anon_key: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    pub cookie_max_age_secs: i64,
    /// Session cookie values longer than this are split into chunks
    pub cookie_chunk_size: usize,
    /// Refresh when the access token expires within this window
    pub refresh_margin_secs: i64,
    /// Where successful callbacks land without an explicit target
    pub default_redirect: String,
    /// Where failed callbacks land
    pub error_route: String,
    pub login_route: String,
    pub forgot_password_route: String,
    pub connect_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:3000".to_string(),
            supabase_url: "http://127.0.0.1:54321".to_string(),
            anon_key: String::new(),
            cookie_secure: true,
            cookie_max_age_secs: SESSION_COOKIE_MAX_AGE_SECS,
            cookie_chunk_size: 3180,
            refresh_margin_secs: 90,
            default_redirect: "/dashboard".to_string(),
            error_route: "/auth/error".to_string(),
            login_route: "/auth/login".to_string(),
            forgot_password_route: "/auth/forgot-password".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl AuthConfig {
    /// Build from the three required settings, validating the URLs
    pub fn new(site_url: &str, supabase_url: &str, anon_key: impl Into<String>) -> AuthResult<Self> {
        let anon_key = anon_key.into();
        if anon_key.trim().is_empty() {
            return Err(AuthError::Config("anon key is empty".to_string()));
        }

        Ok(Self {
            site_url: normalize_origin(site_url)?,
            supabase_url: normalize_origin(supabase_url)?,
            anon_key,
            ..Default::default()
        })
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Base URL of the auth REST API
    pub fn auth_api_url(&self) -> String {
        format!("{}/auth/v1", self.supabase_url)
    }

    /// Session cookie name: `sb-<project-ref>-auth-token`
    ///
    /// The project ref is the first label of the project host.
    pub fn storage_key(&self) -> String {
        let project_ref = Url::parse(&self.supabase_url)
            .ok()
            .and_then(|url| url.host_str().map(|h| h.split('.').next().unwrap_or(h).to_string()))
            .unwrap_or_else(|| "local".to_string());

        format!("sb-{project_ref}-auth-token")
    }

    /// Attributes of the session cookies
    ///
    /// Not HttpOnly: the browser client reads the same cookies.
    pub fn cookie_options(&self) -> CookieOptions {
        CookieOptions {
            path: "/".to_string(),
            domain: None,
            secure: self.cookie_secure,
            http_only: false,
            same_site: SameSite::Lax,
            max_age_secs: Some(self.cookie_max_age_secs),
        }
    }

    /// Absolute URL on this site
    pub fn site_link(&self, path: &str) -> String {
        format!("{}{}", self.site_url, path)
    }
}

/// `path?key=message`, form-encoded, for flash messages on form pages
pub fn flash_link(path: &str, key: &str, message: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(key, message)
        .finish();
    format!("{path}?{query}")
}

fn normalize_origin(raw: &str) -> AuthResult<String> {
    let url = Url::parse(raw.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AuthError::Config(format!("unsupported URL scheme: {raw}")));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_urls() {
        let config = AuthConfig::new(
            "https://site.example/",
            "https://abcdefgh.supabase.co/",
            "anon",
        )
        .unwrap();

        assert_eq!(config.site_url, "https://site.example");
        assert_eq!(config.auth_api_url(), "https://abcdefgh.supabase.co/auth/v1");
        assert_eq!(config.site_link("/auth/callback"), "https://site.example/auth/callback");
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(matches!(
            AuthConfig::new("not a url", "https://x.supabase.co", "anon"),
            Err(AuthError::Config(_))
        ));
        assert!(AuthConfig::new("ftp://site", "https://x.supabase.co", "anon").is_err());
        assert!(AuthConfig::new("https://site", "https://x.supabase.co", " ").is_err());
    }

    #[test]
    fn test_storage_key() {
        let config = AuthConfig::new("https://site", "https://abcdefgh.supabase.co", "k").unwrap();
        assert_eq!(config.storage_key(), "sb-abcdefgh-auth-token");

        assert_eq!(AuthConfig::default().storage_key(), "sb-127-auth-token");
    }

    #[test]
    fn test_flash_link() {
        assert_eq!(
            flash_link("/auth/login", "error", "Invalid login credentials"),
            "/auth/login?error=Invalid+login+credentials"
        );
        assert_eq!(flash_link("/x", "message", "a&b=c"), "/x?message=a%26b%3Dc");
    }

    #[test]
    fn test_cookie_options() {
        let options = AuthConfig::development().cookie_options();
        assert!(!options.secure);
        assert!(!options.http_only);
        assert_eq!(options.max_age_secs, Some(400 * 24 * 3600));
    }
}
