//! Request extension carrying the resolved locale

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

use crate::application::resolve::Resolution;
use crate::domain::locale::Locale;

/// Locale facts for the current request
///
/// Inserted by the request pipeline. Handlers that run without the
/// pipeline get the default locale and the raw path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocale {
    pub locale: Locale,
    pub canonical_path: String,
    pub localized_path: String,
    /// Locale segment the visitor's URL carries (`/es`), empty when unprefixed
    pub prefix: String,
}

impl ResolvedLocale {
    /// `path` as reached from this request's URL space
    ///
    /// Only for routes without localized slugs (`/auth/login`); paths
    /// that are not site-relative are returned unchanged.
    pub fn href(&self, path: &str) -> String {
        if self.prefix.is_empty() || !path.starts_with('/') || path.starts_with("//") {
            return path.to_string();
        }
        match path {
            "/" => self.prefix.clone(),
            _ if path.starts_with("/?") => format!("{}{}", self.prefix, &path[1..]),
            _ => format!("{}{}", self.prefix, path),
        }
    }
}

impl From<&Resolution> for ResolvedLocale {
    fn from(resolution: &Resolution) -> Self {
        let prefix = format!("/{}", resolution.locale);
        let path = resolution.localized_path.as_str();
        let prefixed = path
            .strip_prefix(&prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));

        Self {
            locale: resolution.locale,
            canonical_path: resolution.canonical_path.clone(),
            localized_path: resolution.localized_path.clone(),
            prefix: if prefixed { prefix } else { String::new() },
        }
    }
}

impl<S> FromRequestParts<S> for ResolvedLocale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(resolved) = parts.extensions.get::<ResolvedLocale>() {
            return Ok(resolved.clone());
        }

        let path = parts.uri.path().to_string();
        Ok(Self {
            locale: Locale::default(),
            canonical_path: path.clone(),
            localized_path: path,
            prefix: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_extension_is_used() {
        let (mut parts, _) = Request::builder()
            .uri("/pricing")
            .body(())
            .unwrap()
            .into_parts();
        let resolved = ResolvedLocale {
            locale: Locale::Es,
            canonical_path: "/pricing".into(),
            localized_path: "/es/precios".into(),
            prefix: "/es".into(),
        };
        parts.extensions.insert(resolved.clone());

        let extracted = ResolvedLocale::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(extracted, resolved);
    }

    #[tokio::test]
    async fn test_falls_back_to_default_locale() {
        let (mut parts, _) = Request::builder()
            .uri("/about?x=1")
            .body(())
            .unwrap()
            .into_parts();

        let extracted = ResolvedLocale::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(extracted.locale, Locale::En);
        assert_eq!(extracted.canonical_path, "/about");
    }

    fn resolution(locale: Locale, canonical: &str, localized: &str) -> Resolution {
        Resolution {
            locale,
            canonical_path: canonical.into(),
            localized_path: localized.into(),
            redirect: None,
            persist_locale: false,
        }
    }

    #[test]
    fn test_prefix_follows_visitor_url() {
        let es = ResolvedLocale::from(&resolution(Locale::Es, "/auth/login", "/es/auth/login"));
        assert_eq!(es.prefix, "/es");
        assert_eq!(es.href("/auth/login?error=Bad+login"), "/es/auth/login?error=Bad+login");
        assert_eq!(es.href("/"), "/es");
        assert_eq!(es.href("https://idp.example/authorize"), "https://idp.example/authorize");

        let home = ResolvedLocale::from(&resolution(Locale::Es, "/", "/es"));
        assert_eq!(home.prefix, "/es");

        let en = ResolvedLocale::from(&resolution(Locale::En, "/auth/login", "/auth/login"));
        assert_eq!(en.prefix, "");
        assert_eq!(en.href("/auth/login"), "/auth/login");

        // `/essay` is not under `/es`
        let unprefixed = ResolvedLocale::from(&resolution(Locale::Es, "/essay", "/essay"));
        assert_eq!(unprefixed.prefix, "");
    }
}
