//! Application Configuration
//!
//! Configuration for the Billing application layer.

use std::time::Duration;
use url::Url;

use crate::error::{BillingError, BillingResult};

pub const PADDLE_SANDBOX_URL: &str = "https://sandbox-api.paddle.com";

/// Billing application configuration
#[derive(Clone)]
pub struct BillingConfig {
    /// Paddle API base URL, no trailing slash
    pub paddle_api_url: String,
    /// Paddle server-side API key
    pub paddle_api_key: String,
    /// Identity backend project URL (hosts the customer directory)
    pub supabase_url: String,
    pub anon_key: String,
    /// Page size for subscription and transaction lists
    pub per_page: u32,
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for BillingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingConfig")
            .field("paddle_api_url", &self.paddle_api_url)
            .field("supabase_url", &self.supabase_url)
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            paddle_api_url: PADDLE_SANDBOX_URL.to_string(),
            paddle_api_key: String::new(),
            supabase_url: "http://127.0.0.1:54321".to_string(),
            anon_key: String::new(),
            per_page: 20,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl BillingConfig {
    pub fn new(
        paddle_api_url: &str,
        paddle_api_key: impl Into<String>,
        supabase_url: &str,
        anon_key: impl Into<String>,
    ) -> BillingResult<Self> {
        let paddle_api_key = paddle_api_key.into();
        if paddle_api_key.trim().is_empty() {
            return Err(BillingError::Config("Paddle API key is empty".to_string()));
        }

        Ok(Self {
            paddle_api_url: normalize(paddle_api_url)?,
            paddle_api_key,
            supabase_url: normalize(supabase_url)?,
            anon_key: anon_key.into(),
            ..Default::default()
        })
    }

    /// Create config for development (Paddle sandbox, local identity backend)
    pub fn development() -> Self {
        Self::default()
    }

    /// PostgREST endpoint of the identity backend
    pub fn rest_api_url(&self) -> String {
        format!("{}/rest/v1", self.supabase_url)
    }
}

fn normalize(raw: &str) -> BillingResult<String> {
    let url = Url::parse(raw.trim())?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let config = BillingConfig::new(
            "https://api.paddle.com/",
            "pdl_key",
            "https://abcdefgh.supabase.co",
            "anon",
        )
        .unwrap();
        assert_eq!(config.paddle_api_url, "https://api.paddle.com");
        assert_eq!(config.rest_api_url(), "https://abcdefgh.supabase.co/rest/v1");
        assert_eq!(config.per_page, 20);
        assert!(!format!("{config:?}").contains("pdl_key"));
    }

    #[test]
    fn test_new_rejects_empty_key() {
        assert!(matches!(
            BillingConfig::new(PADDLE_SANDBOX_URL, "", "https://x.supabase.co", "anon"),
            Err(BillingError::Config(_))
        ));
    }
}
