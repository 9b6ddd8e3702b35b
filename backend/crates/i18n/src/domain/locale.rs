//! Locale Value Object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::I18nError;

/// Supported site locales
///
/// `En` is the default locale and is never shown as a path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

/// Every supported locale, default first
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Es];

impl Locale {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Exact tag match, as used for path segments (`es`, not `es-MX`)
    pub fn from_tag(tag: &str) -> Option<Self> {
        SUPPORTED_LOCALES
            .iter()
            .copied()
            .find(|locale| locale.as_str() == tag)
    }

    /// Lenient parse for headers and cookies
    ///
    /// Case-insensitive and tolerant of region subtags (`es-MX`, `en_GB`).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        Self::from_tag(lang)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| I18nError::UnsupportedLocale(s.to_string()))
    }
}
