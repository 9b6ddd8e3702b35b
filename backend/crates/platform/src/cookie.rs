//! Cookie Management Infrastructure
//!
//! [`CookieSet`] is the ordered, name-unique cookie collection used on both
//! sides of an exchange: the request jar (what handlers further down the
//! stack will read) and the response jar (what becomes `Set-Cookie`).

use axum::http::{HeaderMap, HeaderValue, header};
pub use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Attributes applied to cookies written by this service
#[derive(Debug, Clone)]
pub struct CookieOptions {
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: None,
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            max_age_secs: None,
        }
    }
}

impl CookieOptions {
    /// Build a cookie carrying these attributes
    pub fn build(&self, name: impl Into<String>, value: impl Into<String>) -> Cookie<'static> {
        let mut cookie = Cookie::build((name.into(), value.into()))
            .path(self.path.clone())
            .secure(self.secure)
            .http_only(self.http_only)
            .same_site(self.same_site)
            .build();

        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        if let Some(max_age) = self.max_age_secs {
            cookie.set_max_age(Duration::seconds(max_age));
        }

        cookie
    }

    /// Build a removal cookie: empty value, `Max-Age=0`, same path/domain
    pub fn build_removal(&self, name: impl Into<String>) -> Cookie<'static> {
        let mut cookie = self.build(name, "");
        cookie.set_max_age(Duration::ZERO);
        cookie
    }
}

/// Returns true when the cookie instructs the browser to delete it
pub fn is_removal(cookie: &Cookie<'_>) -> bool {
    cookie.max_age() == Some(Duration::ZERO)
}

/// Insertion-ordered cookie collection, unique by name
#[derive(Debug, Clone, Default)]
pub struct CookieSet {
    entries: Vec<Cookie<'static>>,
}

impl CookieSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every `Cookie` header of a request
    ///
    /// HTTP/2 clients may split cookies over several headers, so all of
    /// them are read. A later duplicate name wins.
    pub fn from_request_headers(headers: &HeaderMap) -> Self {
        let mut set = Self::new();

        for value in headers.get_all(header::COOKIE) {
            let Ok(raw) = value.to_str() else {
                continue;
            };

            for pair in raw.split(';') {
                let Some((name, value)) = pair.trim().split_once('=') else {
                    continue;
                };
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                set.set(Cookie::new(name.to_string(), value.trim().to_string()));
            }
        }

        set
    }

    pub fn get(&self, name: &str) -> Option<&Cookie<'static>> {
        self.entries.iter().find(|c| c.name() == name)
    }

    /// Value of a cookie, if present
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|c| c.value())
    }

    /// Insert or replace (in place, keeping the original position)
    pub fn set(&mut self, cookie: Cookie<'static>) {
        match self.entries.iter_mut().find(|c| c.name() == cookie.name()) {
            Some(existing) => *existing = cookie,
            None => self.entries.push(cookie),
        }
    }

    /// Apply every cookie of `other` on top of this set
    pub fn merge(&mut self, other: CookieSet) {
        for cookie in other.entries {
            self.set(cookie);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie<'static>> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as a single request `Cookie` header value (`a=1; b=2`)
    pub fn to_request_header(&self) -> Option<HeaderValue> {
        if self.entries.is_empty() {
            return None;
        }

        let joined = self
            .entries
            .iter()
            .map(|c| format!("{}={}", c.name(), c.value()))
            .collect::<Vec<_>>()
            .join("; ");

        HeaderValue::from_str(&joined).ok()
    }

    /// Replace the request's `Cookie` headers with this set
    pub fn write_request_headers(&self, headers: &mut HeaderMap) {
        headers.remove(header::COOKIE);
        if let Some(value) = self.to_request_header() {
            headers.insert(header::COOKIE, value);
        }
    }

    /// Append one `Set-Cookie` header per cookie
    pub fn append_set_cookie_headers(&self, headers: &mut HeaderMap) {
        for cookie in &self.entries {
            match HeaderValue::from_str(&cookie.to_string()) {
                Ok(value) => {
                    headers.append(header::SET_COOKIE, value);
                }
                Err(_) => {
                    tracing::warn!(cookie = %cookie.name(), "Dropping cookie with invalid header value");
                }
            }
        }
    }

    /// Append `Set-Cookie` only for names the response does not already set
    ///
    /// Writes already on the response come from further down the stack and
    /// reflect a later state of the exchange, so they win.
    pub fn append_unset_cookie_headers(&self, headers: &mut HeaderMap) {
        let taken = set_cookie_names(headers);
        let remaining: CookieSet = self
            .entries
            .iter()
            .filter(|c| !taken.iter().any(|name| name == c.name()))
            .cloned()
            .collect();
        remaining.append_set_cookie_headers(headers);
    }
}

/// Names of every cookie a response sets
pub fn set_cookie_names(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|raw| Cookie::parse(raw).ok())
        .map(|cookie| cookie.name().to_string())
        .collect()
}

impl FromIterator<Cookie<'static>> for CookieSet {
    fn from_iter<I: IntoIterator<Item = Cookie<'static>>>(iter: I) -> Self {
        let mut set = Self::new();
        for cookie in iter {
            set.set(cookie);
        }
        set
    }
}

impl IntoIterator for CookieSet {
    type Item = Cookie<'static>;
    type IntoIter = std::vec::IntoIter<Cookie<'static>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_options_build() {
        let options = CookieOptions {
            path: "/auth".to_string(),
            domain: None,
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            max_age_secs: Some(3600),
        };

        let rendered = options.build("test", "value123").to_string();
        assert!(rendered.contains("test=value123"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Path=/auth"));
        assert!(rendered.contains("Max-Age=3600"));
    }

    #[test]
    fn test_removal_cookie() {
        let removal = CookieOptions::default().build_removal("gone");
        assert_eq!(removal.value(), "");
        assert!(is_removal(&removal));
        assert!(removal.to_string().contains("Max-Age=0"));
    }

    #[test]
    fn test_from_request_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; session=abc123; other=xyz"),
        );
        headers.append(header::COOKIE, HeaderValue::from_static("late=1; foo=baz"));

        let set = CookieSet::from_request_headers(&headers);
        assert_eq!(set.value("session"), Some("abc123"));
        assert_eq!(set.value("foo"), Some("baz"));
        assert_eq!(set.value("late"), Some("1"));
        assert_eq!(set.value("missing"), None);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut set = CookieSet::new();
        set.set(Cookie::new("a", "1"));
        set.set(Cookie::new("b", "2"));
        set.set(Cookie::new("a", "3"));

        assert_eq!(set.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(set.value("a"), Some("3"));
    }

    #[test]
    fn test_write_request_headers_round_trip() {
        let mut set = CookieSet::new();
        set.set(Cookie::new("a", "1"));
        set.set(Cookie::new("b", "two"));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("stale=yes"));
        set.write_request_headers(&mut headers);

        assert_eq!(headers.get_all(header::COOKIE).iter().count(), 1);
        let reparsed = CookieSet::from_request_headers(&headers);
        assert_eq!(reparsed.value("a"), Some("1"));
        assert_eq!(reparsed.value("b"), Some("two"));
        assert_eq!(reparsed.value("stale"), None);
    }

    #[test]
    fn test_empty_set_clears_request_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("stale=yes"));
        CookieSet::new().write_request_headers(&mut headers);
        assert!(headers.get(header::COOKIE).is_none());
    }

    #[test]
    fn test_append_set_cookie_headers() {
        let options = CookieOptions::default();
        let set: CookieSet = [options.build("a", "1"), options.build_removal("b")]
            .into_iter()
            .collect();

        let mut headers = HeaderMap::new();
        set.append_set_cookie_headers(&mut headers);

        let values: Vec<_> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 2);
        assert!(values[0].starts_with("a=1"));
        assert!(values[1].starts_with("b="));
        assert!(values[1].contains("Max-Age=0"));
    }

    #[test]
    fn test_append_unset_cookie_headers_keeps_existing_writes() {
        let options = CookieOptions::default();
        let mut headers = HeaderMap::new();
        CookieSet::from_iter([options.build_removal("session")])
            .append_set_cookie_headers(&mut headers);

        let late: CookieSet = [options.build("session", "live"), options.build("locale", "es")]
            .into_iter()
            .collect();
        late.append_unset_cookie_headers(&mut headers);

        let values: Vec<_> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 2);
        assert!(values[0].starts_with("session="));
        assert!(values[0].contains("Max-Age=0"));
        assert!(values[1].starts_with("locale=es"));
        assert_eq!(set_cookie_names(&headers), vec!["session", "locale"]);
    }
}
