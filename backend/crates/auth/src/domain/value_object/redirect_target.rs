//! Post-auth redirect target
//!
//! Only same-site absolute paths are accepted. `//host` and `/\host` are
//! protocol-relative in browsers and would leave the site.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget(String);

impl RedirectTarget {
    pub fn new(raw: &str) -> Option<Self> {
        let safe = raw.starts_with('/')
            && !raw.starts_with("//")
            && !raw.contains('\\')
            && !raw.chars().any(char::is_control);

        safe.then(|| Self(raw.to_string()))
    }

    /// `raw` if it is safe, else `default`
    pub fn or_default(raw: Option<&str>, default: &str) -> Self {
        match raw.and_then(Self::new) {
            Some(target) => target,
            None => {
                if let Some(rejected) = raw {
                    tracing::warn!(redirect_to = %rejected, "Rejected unsafe redirect target");
                }
                Self(default.to_string())
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
