//! Locale Resolution
//!
//! Maps an incoming path to the locale it is served in, the route key the
//! router knows it by, and (when the visitor is on a non-canonical URL) the
//! URL to redirect to. Pure: the caller supplies cookie and header values.

use std::sync::Arc;

use crate::application::config::RoutingConfig;
use crate::application::detect::preferred_locale;
use crate::domain::locale::Locale;

/// Request facts the resolver looks at
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleRequest<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    /// GET or HEAD; only navigations are redirected by detection
    pub is_navigation: bool,
    pub cookie_locale: Option<&'a str>,
    pub accept_language: Option<&'a str>,
}

/// Outcome of resolving one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub locale: Locale,
    /// Route key the downstream router matches on
    pub canonical_path: String,
    /// Path as the visitor sees it, prefix included
    pub localized_path: String,
    /// Redirect target (path and query) when the URL is not canonical
    pub redirect: Option<String>,
    /// Whether the locale cookie must be (re)written
    pub persist_locale: bool,
}

/// Locale resolver
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    config: Arc<RoutingConfig>,
}

impl LocaleResolver {
    pub fn new(config: Arc<RoutingConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn default_locale(&self) -> Locale {
        self.config.default_locale
    }

    /// Resolve the locale and canonical route of a request
    ///
    /// Never fails: anything unrecognized is served in the default locale
    /// with the path untouched.
    pub fn resolve(&self, req: &LocaleRequest<'_>) -> Resolution {
        let prefixed = split_locale_segment(req.path).and_then(|(segment, rest)| {
            Locale::from_tag(segment)
                .filter(|locale| self.config.is_supported(*locale))
                .map(|locale| (locale, rest))
        });

        let resolution = match prefixed {
            Some((locale, rest)) => self.resolve_prefixed(locale, rest, req),
            None => self.resolve_unprefixed(req),
        };

        if let Some(target) = &resolution.redirect {
            tracing::debug!(
                path = %req.path,
                locale = %resolution.locale,
                redirect_to = %target,
                "Locale redirect"
            );
        }

        resolution
    }

    fn resolve_prefixed(&self, locale: Locale, rest: &str, req: &LocaleRequest<'_>) -> Resolution {
        let table = &self.config.pathnames;

        // `/en/...` is never canonical
        if locale == self.config.default_locale {
            let route = table
                .route_for(locale, rest)
                .or_else(|| table.route_for_any(rest))
                .unwrap_or(rest);
            let target = self.localized_href(route, locale);

            return Resolution {
                locale,
                canonical_path: route.to_string(),
                redirect: Some(with_query(&target, req.query)),
                localized_path: target,
                persist_locale: self.should_persist(locale, req),
            };
        }

        if let Some(route) = table.route_for(locale, rest) {
            return Resolution {
                locale,
                canonical_path: route.to_string(),
                localized_path: self.localized_href(route, locale),
                redirect: None,
                persist_locale: self.should_persist(locale, req),
            };
        }

        // Reached through another locale's slug (`/es/pricing`)
        if let Some(route) = table.route_for_any(rest) {
            let target = self.localized_href(route, locale);
            return Resolution {
                locale,
                canonical_path: route.to_string(),
                redirect: Some(with_query(&target, req.query)),
                localized_path: target,
                persist_locale: self.should_persist(locale, req),
            };
        }

        Resolution {
            locale,
            canonical_path: rest.to_string(),
            localized_path: req.path.to_string(),
            redirect: None,
            persist_locale: self.should_persist(locale, req),
        }
    }

    fn resolve_unprefixed(&self, req: &LocaleRequest<'_>) -> Resolution {
        let default = self.config.default_locale;
        let route = self
            .config
            .pathnames
            .route_for(default, req.path)
            .unwrap_or(req.path);

        if self.config.locale_detection && req.is_navigation {
            let preferred = preferred_locale(
                req.cookie_locale,
                req.accept_language,
                &self.config.locales,
            );

            if let Some(locale) = preferred.filter(|l| *l != default) {
                let target = self.localized_href(route, locale);
                return Resolution {
                    locale,
                    canonical_path: route.to_string(),
                    redirect: Some(with_query(&target, req.query)),
                    localized_path: target,
                    persist_locale: self.should_persist(locale, req),
                };
            }
        }

        Resolution {
            locale: default,
            canonical_path: route.to_string(),
            localized_path: req.path.to_string(),
            redirect: None,
            persist_locale: self.should_persist(default, req),
        }
    }

    fn should_persist(&self, locale: Locale, req: &LocaleRequest<'_>) -> bool {
        req.is_navigation && req.cookie_locale != Some(locale.as_str())
    }

    /// Public URL path of `route` in `locale`
    ///
    /// The default locale is never prefixed; the home page of another
    /// locale is just the prefix (`/es`).
    pub fn localized_href(&self, route: &str, locale: Locale) -> String {
        let slug = self.config.pathnames.localize(route, locale);

        if locale == self.config.default_locale {
            slug.to_string()
        } else if slug == "/" {
            format!("/{locale}")
        } else {
            format!("/{locale}{slug}")
        }
    }

    /// `route` in every configured locale (for language switchers)
    pub fn alternates(&self, route: &str) -> Vec<(Locale, String)> {
        self.config
            .locales
            .iter()
            .map(|locale| (*locale, self.localized_href(route, *locale)))
            .collect()
    }
}

/// First path segment and the remaining path (`/es/precios` → `es`, `/precios`)
fn split_locale_segment(path: &str) -> Option<(&str, &str)> {
    let trimmed = path.strip_prefix('/')?;
    Some(match trimmed.find('/') {
        Some(i) => (&trimmed[..i], &trimmed[i..]),
        None => (trimmed, "/"),
    })
}

fn with_query(path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{path}?{q}"),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> LocaleResolver {
        LocaleResolver::new(Arc::new(RoutingConfig::default()))
    }

    fn get(path: &str) -> LocaleRequest<'_> {
        LocaleRequest {
            path,
            is_navigation: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_split_locale_segment() {
        assert_eq!(split_locale_segment("/es/precios"), Some(("es", "/precios")));
        assert_eq!(split_locale_segment("/es"), Some(("es", "/")));
        assert_eq!(split_locale_segment("/es/"), Some(("es", "/")));
        assert_eq!(split_locale_segment("/"), Some(("", "/")));
        assert_eq!(split_locale_segment("relative"), None);
    }

    #[test]
    fn test_prefixed_non_default_locale() {
        let r = resolver().resolve(&get("/es/precios"));
        assert_eq!(r.locale, Locale::Es);
        assert_eq!(r.canonical_path, "/pricing");
        assert_eq!(r.localized_path, "/es/precios");
        assert_eq!(r.redirect, None);
    }

    #[test]
    fn test_prefixed_home() {
        let r = resolver().resolve(&get("/es"));
        assert_eq!(r.locale, Locale::Es);
        assert_eq!(r.canonical_path, "/");
        assert_eq!(r.localized_path, "/es");
        assert_eq!(r.redirect, None);
    }

    #[test]
    fn test_unprefixed_is_default_locale() {
        let r = resolver().resolve(&get("/pricing"));
        assert_eq!(r.locale, Locale::En);
        assert_eq!(r.canonical_path, "/pricing");
        assert_eq!(r.redirect, None);
    }

    #[test]
    fn test_default_locale_prefix_redirects() {
        let req = LocaleRequest {
            query: Some("ref=nav"),
            ..get("/en/pricing")
        };
        let r = resolver().resolve(&req);
        assert_eq!(r.locale, Locale::En);
        assert_eq!(r.redirect.as_deref(), Some("/pricing?ref=nav"));

        let r = resolver().resolve(&get("/en"));
        assert_eq!(r.redirect.as_deref(), Some("/"));
    }

    #[test]
    fn test_wrong_slug_is_corrected() {
        let r = resolver().resolve(&get("/es/pricing"));
        assert_eq!(r.locale, Locale::Es);
        assert_eq!(r.canonical_path, "/pricing");
        assert_eq!(r.redirect.as_deref(), Some("/es/precios"));
    }

    #[test]
    fn test_unknown_locale_segment_falls_back() {
        let r = resolver().resolve(&get("/fr/about"));
        assert_eq!(r.locale, Locale::En);
        assert_eq!(r.canonical_path, "/fr/about");
        assert_eq!(r.redirect, None);
    }

    #[test]
    fn test_unmapped_path_under_prefix_is_invariant() {
        let r = resolver().resolve(&get("/es/dashboard"));
        assert_eq!(r.locale, Locale::Es);
        assert_eq!(r.canonical_path, "/dashboard");
        assert_eq!(r.localized_path, "/es/dashboard");
        assert_eq!(r.redirect, None);
    }

    #[test]
    fn test_detection_from_accept_language() {
        let req = LocaleRequest {
            accept_language: Some("es-ES,es;q=0.9,en;q=0.8"),
            query: Some("a=1"),
            ..get("/about")
        };
        let r = resolver().resolve(&req);
        assert_eq!(r.locale, Locale::Es);
        assert_eq!(r.redirect.as_deref(), Some("/es/acerca-de?a=1"));
        assert!(r.persist_locale);
    }

    #[test]
    fn test_cookie_overrides_accept_language() {
        let req = LocaleRequest {
            cookie_locale: Some("en"),
            accept_language: Some("es"),
            ..get("/about")
        };
        let r = resolver().resolve(&req);
        assert_eq!(r.locale, Locale::En);
        assert_eq!(r.redirect, None);
        assert!(!r.persist_locale);
    }

    #[test]
    fn test_detection_skipped_for_non_navigation() {
        let req = LocaleRequest {
            path: "/about",
            is_navigation: false,
            accept_language: Some("es"),
            ..Default::default()
        };
        let r = resolver().resolve(&req);
        assert_eq!(r.locale, Locale::En);
        assert_eq!(r.redirect, None);
        assert!(!r.persist_locale);
    }

    #[test]
    fn test_detection_disabled() {
        let config = RoutingConfig {
            locale_detection: false,
            ..Default::default()
        };
        let req = LocaleRequest {
            accept_language: Some("es"),
            ..get("/")
        };
        let r = LocaleResolver::new(Arc::new(config)).resolve(&req);
        assert_eq!(r.locale, Locale::En);
        assert_eq!(r.redirect, None);
    }

    #[test]
    fn test_persist_when_cookie_differs() {
        let req = LocaleRequest {
            cookie_locale: Some("en"),
            ..get("/es/precios")
        };
        assert!(resolver().resolve(&req).persist_locale);

        let req = LocaleRequest {
            cookie_locale: Some("es"),
            ..get("/es/precios")
        };
        assert!(!resolver().resolve(&req).persist_locale);
    }

    #[test]
    fn test_localized_href_and_alternates() {
        let resolver = resolver();
        assert_eq!(resolver.localized_href("/pricing", Locale::Es), "/es/precios");
        assert_eq!(resolver.localized_href("/pricing", Locale::En), "/pricing");
        assert_eq!(resolver.localized_href("/", Locale::Es), "/es");
        assert_eq!(resolver.localized_href("/", Locale::En), "/");
        assert_eq!(resolver.localized_href("/dashboard", Locale::Es), "/es/dashboard");

        assert_eq!(
            resolver.alternates("/about"),
            vec![
                (Locale::En, "/about".to_string()),
                (Locale::Es, "/es/acerca-de".to_string())
            ]
        );
    }
}
