//! Routing Configuration

use crate::domain::locale::{Locale, SUPPORTED_LOCALES};
use crate::domain::pathname::PathnameTable;
use crate::error::{I18nError, I18nResult};

/// Locale routing configuration
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Locales in preference order for ties
    pub locales: Vec<Locale>,
    /// Locale served without a path prefix
    pub default_locale: Locale,
    pub pathnames: PathnameTable,
    /// Redirect unprefixed requests to the visitor's preferred locale
    pub locale_detection: bool,
    /// Cookie remembering the last locale the visitor used
    pub cookie_name: String,
    /// Locale cookie lifetime (1 year)
    pub cookie_max_age_secs: i64,
    pub cookie_secure: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            locales: SUPPORTED_LOCALES.to_vec(),
            default_locale: Locale::En,
            pathnames: PathnameTable::site(),
            locale_detection: true,
            cookie_name: "locale".to_string(),
            cookie_max_age_secs: 365 * 24 * 3600,
            cookie_secure: true,
        }
    }
}

impl RoutingConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Check the default locale is configured
    pub fn validate(&self) -> I18nResult<()> {
        if !self.locales.contains(&self.default_locale) {
            return Err(I18nError::DefaultLocaleMissing(self.default_locale));
        }
        Ok(())
    }

    pub fn is_supported(&self, locale: Locale) -> bool {
        self.locales.contains(&locale)
    }
}
