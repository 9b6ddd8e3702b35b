//! Cross-module tests for locale routing

use std::sync::Arc;

use crate::application::config::RoutingConfig;
use crate::application::resolve::{LocaleRequest, LocaleResolver};
use crate::domain::locale::SUPPORTED_LOCALES;

fn resolver() -> LocaleResolver {
    LocaleResolver::new(Arc::new(RoutingConfig::default()))
}

#[test]
fn test_every_route_round_trips_in_every_locale() {
    let resolver = resolver();
    let routes: Vec<String> = resolver
        .config()
        .pathnames
        .routes()
        .map(str::to_string)
        .chain(["/dashboard".to_string(), "/auth/login".to_string()])
        .collect();

    for route in &routes {
        for locale in SUPPORTED_LOCALES {
            let href = resolver.localized_href(route, *locale);
            let resolution = resolver.resolve(&LocaleRequest {
                path: &href,
                is_navigation: true,
                cookie_locale: Some(locale.as_str()),
                ..Default::default()
            });

            assert_eq!(resolution.locale, *locale, "locale of {href}");
            assert_eq!(&resolution.canonical_path, route, "route of {href}");
            assert_eq!(resolution.redirect, None, "{href} should be canonical");
            assert_eq!(resolution.localized_path, href);
            assert!(!resolution.persist_locale);
        }
    }
}

#[test]
fn test_redirect_targets_are_canonical() {
    let resolver = resolver();

    for path in ["/en/about", "/es/about", "/en/precios", "/en"] {
        let first = resolver.resolve(&LocaleRequest {
            path,
            is_navigation: true,
            ..Default::default()
        });
        let target = first.redirect.expect("non-canonical path redirects");

        let second = resolver.resolve(&LocaleRequest {
            path: &target,
            is_navigation: true,
            cookie_locale: Some(first.locale.as_str()),
            ..Default::default()
        });
        assert_eq!(second.redirect, None, "{path} -> {target} must settle");
        assert_eq!(second.locale, first.locale);
        assert_eq!(second.canonical_path, first.canonical_path);
    }
}

#[test]
fn test_detected_redirect_settles() {
    let resolver = resolver();
    let first = resolver.resolve(&LocaleRequest {
        path: "/",
        is_navigation: true,
        accept_language: Some("es"),
        ..Default::default()
    });
    assert_eq!(first.redirect.as_deref(), Some("/es"));

    // Browser follows the redirect with the cookie just set
    let second = resolver.resolve(&LocaleRequest {
        path: "/es",
        is_navigation: true,
        cookie_locale: Some("es"),
        accept_language: Some("es"),
        ..Default::default()
    });
    assert_eq!(second.redirect, None);
    assert_eq!(second.canonical_path, "/");
}
