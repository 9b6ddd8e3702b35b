//! Pathname Mapping
//!
//! Bidirectional table between route keys (the path the router knows) and
//! the slug each locale shows in the address bar. Paths missing from the
//! table are locale-invariant.

use crate::domain::locale::Locale;
use crate::error::{I18nError, I18nResult};

#[derive(Debug, Clone, PartialEq, Eq)]
struct RouteEntry {
    route: String,
    localized: Vec<(Locale, String)>,
}

impl RouteEntry {
    fn slug(&self, locale: Locale) -> Option<&str> {
        self.localized
            .iter()
            .find(|(l, _)| *l == locale)
            .map(|(_, path)| path.as_str())
    }
}

/// Route key ⇄ localized slug table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathnameTable {
    routes: Vec<RouteEntry>,
}

impl PathnameTable {
    /// Build a table, checking every route is localized for every locale
    pub fn from_entries<'a, I, L>(locales: &[Locale], entries: I) -> I18nResult<Self>
    where
        I: IntoIterator<Item = (&'a str, L)>,
        L: IntoIterator<Item = (Locale, &'a str)>,
    {
        let mut routes = Vec::new();

        for (route, localized) in entries {
            check_path(route)?;

            let localized: Vec<(Locale, String)> = localized
                .into_iter()
                .map(|(locale, path)| check_path(path).map(|_| (locale, path.to_string())))
                .collect::<I18nResult<_>>()?;

            let entry = RouteEntry {
                route: route.to_string(),
                localized,
            };

            for locale in locales {
                if entry.slug(*locale).is_none() {
                    return Err(I18nError::MissingLocalization {
                        route: entry.route,
                        locale: *locale,
                    });
                }
            }

            routes.push(entry);
        }

        Ok(Self { routes })
    }

    /// The site's marketing pages
    pub fn site() -> Self {
        let entry = |route: &str, en: &str, es: &str| RouteEntry {
            route: route.to_string(),
            localized: vec![(Locale::En, en.to_string()), (Locale::Es, es.to_string())],
        };

        Self {
            routes: vec![
                entry("/", "/", "/"),
                entry("/pricing", "/pricing", "/precios"),
                entry("/about", "/about", "/acerca-de"),
            ],
        }
    }

    /// Slug shown for `route` under `locale`; invariant paths map to themselves
    pub fn localize<'a>(&'a self, route: &'a str, locale: Locale) -> &'a str {
        self.routes
            .iter()
            .find(|e| e.route == route)
            .and_then(|e| e.slug(locale))
            .unwrap_or(route)
    }

    /// Route key whose `locale` slug is `path`
    pub fn route_for(&self, locale: Locale, path: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|e| e.slug(locale) == Some(path))
            .map(|e| e.route.as_str())
    }

    /// Route key reachable through `path` under any locale or as the key itself
    ///
    /// Used to correct a slug that belongs to another locale.
    pub fn route_for_any(&self, path: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|e| e.route == path || e.localized.iter().any(|(_, p)| p == path))
            .map(|e| e.route.as_str())
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|e| e.route.as_str())
    }
}

fn check_path(path: &str) -> I18nResult<()> {
    if path.starts_with('/') && !path.starts_with("//") {
        Ok(())
    } else {
        Err(I18nError::InvalidPathname(path.to_string()))
    }
}
