//! Session cookie storage
//!
//! The session lives in `sb-<ref>-auth-token` as `base64-<base64url(json)>`.
//! Values over the chunk size are split into `<key>.0`, `<key>.1`, ...
//! Every write also expires whatever chunks the old value used and the new
//! one does not.

use platform::cookie::{Cookie, CookieOptions, CookieSet};
use platform::crypto::{from_base64url, to_base64url};

use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;
use crate::error::{AuthError, AuthResult};

const BASE64_PREFIX: &str = "base64-";

#[derive(Debug, Clone)]
pub struct SessionCookieStore {
    key: String,
    options: CookieOptions,
    chunk_size: usize,
}

impl SessionCookieStore {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            key: config.storage_key(),
            options: config.cookie_options(),
            chunk_size: config.cookie_chunk_size.max(1),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Cookie holding the PKCE code verifier
    pub fn verifier_key(&self) -> String {
        format!("{}-code-verifier", self.key)
    }

    fn chunk_name(&self, index: usize) -> String {
        format!("{}.{}", self.key, index)
    }

    /// Names of every session cookie present in `jar` (whole or chunked)
    fn present_names<'a>(&'a self, jar: &'a CookieSet) -> impl Iterator<Item = String> + 'a {
        let chunk_prefix = format!("{}.", self.key);
        jar.names()
            .filter(move |name| {
                *name == self.key
                    || name
                        .strip_prefix(chunk_prefix.as_str())
                        .is_some_and(|n| n.parse::<usize>().is_ok())
            })
            .map(str::to_string)
    }

    /// Stored value with chunks reassembled
    pub fn read_raw(&self, jar: &CookieSet) -> Option<String> {
        if let Some(value) = jar.value(&self.key).filter(|v| !v.is_empty()) {
            return Some(value.to_string());
        }

        let mut combined = String::new();
        for index in 0.. {
            match jar.value(&self.chunk_name(index)) {
                Some(chunk) if !chunk.is_empty() => combined.push_str(chunk),
                _ => break,
            }
        }

        (!combined.is_empty()).then_some(combined)
    }

    /// Decode the stored session
    ///
    /// `Ok(None)` when no session cookie is present; an error when one is
    /// present but cannot be decoded.
    pub fn load(&self, jar: &CookieSet) -> AuthResult<Option<Session>> {
        let Some(raw) = self.read_raw(jar) else {
            return Ok(None);
        };

        let json = match raw.strip_prefix(BASE64_PREFIX) {
            Some(encoded) => {
                let bytes = from_base64url(encoded)
                    .map_err(|e| AuthError::SessionCookie(e.to_string()))?;
                String::from_utf8(bytes).map_err(|e| AuthError::SessionCookie(e.to_string()))?
            }
            None => raw,
        };

        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| AuthError::SessionCookie(e.to_string()))
    }

    /// Encoded cookie value for `session`
    pub fn encode(session: &Session) -> AuthResult<String> {
        let json =
            serde_json::to_string(session).map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(format!("{BASE64_PREFIX}{}", to_base64url(json.as_bytes())))
    }

    /// Cookie writes that store `session`, given the current `jar`
    pub fn store(&self, jar: &CookieSet, session: &Session) -> AuthResult<CookieSet> {
        let value = Self::encode(session)?;
        let mut writes = CookieSet::new();

        if value.len() <= self.chunk_size {
            writes.set(self.options.build(self.key.clone(), value));
        } else {
            // Base64url is ASCII, so byte offsets are char boundaries
            let chunks = value.as_bytes().chunks(self.chunk_size);
            for (index, chunk) in chunks.enumerate() {
                let chunk = String::from_utf8_lossy(chunk).into_owned();
                writes.set(self.options.build(self.chunk_name(index), chunk));
            }
        }

        for stale in self.present_names(jar) {
            if writes.get(&stale).is_none() {
                writes.set(self.options.build_removal(stale));
            }
        }

        Ok(writes)
    }

    /// Cookie writes that remove every session cookie present in `jar`
    pub fn clear(&self, jar: &CookieSet) -> CookieSet {
        self.present_names(jar)
            .map(|name| self.options.build_removal(name))
            .collect()
    }

    pub fn load_verifier(&self, jar: &CookieSet) -> Option<String> {
        jar.value(&self.verifier_key())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn verifier_cookie(&self, verifier: &str) -> Cookie<'static> {
        self.options.build(self.verifier_key(), verifier.to_string())
    }

    pub fn verifier_removal(&self) -> Cookie<'static> {
        self.options.build_removal(self.verifier_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::cookie::is_removal;

    fn session(token_len: usize) -> Session {
        Session {
            access_token: "a".repeat(token_len),
            refresh_token: "refresh".into(),
            token_type: "bearer".into(),
            expires_in: 3600,
            expires_at: Some(1_700_003_600),
            user: None,
        }
    }

    fn store() -> SessionCookieStore {
        SessionCookieStore::new(&AuthConfig::development())
    }

    /// Apply writes the way a browser would
    fn browser_apply(jar: &mut CookieSet, writes: &CookieSet) {
        let mut next = CookieSet::new();
        for cookie in jar.iter() {
            if writes.get(cookie.name()).is_none() {
                next.set(cookie.clone());
            }
        }
        for cookie in writes.iter().filter(|c| !is_removal(c)) {
            next.set(Cookie::new(cookie.name().to_string(), cookie.value().to_string()));
        }
        *jar = next;
    }

    #[test]
    fn test_small_session_is_single_cookie() {
        let store = store();
        let writes = store.store(&CookieSet::new(), &session(10)).unwrap();

        assert_eq!(writes.names().collect::<Vec<_>>(), vec![store.key()]);
        let value = writes.value(store.key()).unwrap();
        assert!(value.starts_with("base64-"));

        let mut jar = CookieSet::new();
        browser_apply(&mut jar, &writes);
        assert_eq!(store.load(&jar).unwrap(), Some(session(10)));
    }

    #[test]
    fn test_large_session_is_chunked_and_reassembled() {
        let store = store();
        let big = session(6000);
        let writes = store.store(&CookieSet::new(), &big).unwrap();

        let names: Vec<_> = writes.names().map(str::to_string).collect();
        assert!(names.len() >= 3);
        assert_eq!(names[0], format!("{}.0", store.key()));
        assert!(writes.iter().all(|c| c.value().len() <= 3180));

        let mut jar = CookieSet::new();
        browser_apply(&mut jar, &writes);
        assert_eq!(store.load(&jar).unwrap(), Some(big));
    }

    #[test]
    fn test_shrinking_session_clears_stale_chunks() {
        let store = store();
        let mut jar = CookieSet::new();
        let writes = store.store(&jar, &session(6000)).unwrap();
        browser_apply(&mut jar, &writes);

        let writes = store.store(&jar, &session(10)).unwrap();
        let chunk0 = format!("{}.0", store.key());
        assert!(is_removal(writes.get(&chunk0).unwrap()));
        assert!(!is_removal(writes.get(store.key()).unwrap()));

        browser_apply(&mut jar, &writes);
        assert!(jar.get(&chunk0).is_none());
        assert_eq!(store.load(&jar).unwrap(), Some(session(10)));
    }

    #[test]
    fn test_growing_session_clears_unchunked_cookie() {
        let store = store();
        let mut jar = CookieSet::new();
        let writes = store.store(&jar, &session(10)).unwrap();
        browser_apply(&mut jar, &writes);

        let writes = store.store(&jar, &session(6000)).unwrap();
        assert!(is_removal(writes.get(store.key()).unwrap()));
    }

    #[test]
    fn test_clear_only_touches_present_cookies() {
        let store = store();
        let mut jar = CookieSet::new();
        let writes = store.store(&jar, &session(6000)).unwrap();
        browser_apply(&mut jar, &writes);
        jar.set(Cookie::new("locale", "es"));

        let writes = store.clear(&jar);
        assert!(!writes.is_empty());
        assert!(writes.iter().all(is_removal));
        assert!(writes.get("locale").is_none());

        assert!(store.clear(&CookieSet::new()).is_empty());
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let store = store();
        assert_eq!(store.load(&CookieSet::new()).unwrap(), None);

        let mut jar = CookieSet::new();
        jar.set(Cookie::new(store.key().to_string(), "base64-!!!".to_string()));
        assert!(matches!(store.load(&jar), Err(AuthError::SessionCookie(_))));

        // Removal mirrored into a request jar leaves an empty value
        let mut jar = CookieSet::new();
        jar.set(Cookie::new(store.key().to_string(), String::new()));
        assert_eq!(store.load(&jar).unwrap(), None);
    }

    #[test]
    fn test_load_accepts_plain_json() {
        let store = store();
        let json = serde_json::to_string(&session(4)).unwrap();
        let mut jar = CookieSet::new();
        jar.set(Cookie::new(store.key().to_string(), json));
        assert_eq!(store.load(&jar).unwrap(), Some(session(4)));
    }

    #[test]
    fn test_verifier_cookie() {
        let store = store();
        assert_eq!(store.verifier_key(), "sb-127-auth-token-code-verifier");

        let mut jar = CookieSet::new();
        assert_eq!(store.load_verifier(&jar), None);
        jar.set(store.verifier_cookie("abc"));
        assert_eq!(store.load_verifier(&jar).as_deref(), Some("abc"));
        assert!(is_removal(&store.verifier_removal()));
    }
}
