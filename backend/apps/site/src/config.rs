//! Site configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).
//! Missing required settings abort startup.

use anyhow::{Context, bail};
use std::net::SocketAddr;

use auth::AuthConfig;
use billing::BillingConfig;
use billing::application::config::PADDLE_SANDBOX_URL;
use i18n::RoutingConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub bind_addr: SocketAddr,
    pub auth: AuthConfig,
    pub routing: RoutingConfig,
    /// `None` when no payments API key is configured
    pub billing: Option<BillingConfig>,
}

impl SiteConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => bail!("{key} must be set in environment"),
            }
        };

        let site_url = required("SITE_URL")?;
        let supabase_url = required("SUPABASE_URL")?;
        let anon_key = required("SUPABASE_ANON_KEY")?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR is not a socket address")?;

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(raw) => parse_flag(&raw).context("COOKIE_SECURE must be true or false")?,
            None => true,
        };

        let mut auth = AuthConfig::new(&site_url, &supabase_url, anon_key.clone())
            .context("Invalid auth settings")?;
        auth.cookie_secure = cookie_secure;

        let routing = RoutingConfig {
            cookie_secure,
            ..RoutingConfig::default()
        };
        routing.validate().context("Invalid locale routing")?;

        let billing = match lookup("PADDLE_API_KEY").filter(|key| !key.trim().is_empty()) {
            Some(api_key) => {
                let api_url = lookup("PADDLE_API_URL").unwrap_or_else(|| PADDLE_SANDBOX_URL.to_string());
                Some(
                    BillingConfig::new(&api_url, api_key, &supabase_url, anon_key)
                        .context("Invalid billing settings")?,
                )
            }
            None => None,
        };

        Ok(Self {
            bind_addr,
            auth,
            routing,
            billing,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
