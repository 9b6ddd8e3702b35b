//! Session Refresher
//!
//! Validates the visitor's session once per request and keeps the request
//! and response cookie jars in step with whatever the auth client wrote.

use platform::cookie::CookieSet;

use crate::application::client::AuthClientFactory;
use crate::domain::entity::User;
use crate::domain::provider::IdentityProvider;

/// Result of one refresh pass
#[derive(Debug, Default)]
pub struct RefreshOutcome {
    /// Validated user, `None` when anonymous or on any failure
    pub user: Option<User>,
    /// Access token of the (possibly refreshed) session
    pub access_token: Option<String>,
    /// Response jar: the caller's jar plus this pass's writes
    pub response_cookies: CookieSet,
}

/// Refresh use case
pub struct SessionRefresher<P> {
    factory: AuthClientFactory<P>,
}

impl<P> SessionRefresher<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    pub fn new(factory: AuthClientFactory<P>) -> Self {
        Self { factory }
    }

    /// Validate (and refresh if needed) the session carried by `request_jar`
    ///
    /// Every cookie the client writes lands in `request_jar`, so handlers
    /// later in the request see the refreshed session, and in the returned
    /// response jar, so the browser stores it. Errors are logged, never
    /// propagated.
    pub async fn update_session(
        &self,
        request_jar: &mut CookieSet,
        response_jar: Option<CookieSet>,
    ) -> RefreshOutcome {
        let mut response_cookies = response_jar.unwrap_or_default();
        let mut client = self.factory.for_request(request_jar);

        let user = match client.get_user().await {
            Ok(user) => user,
            Err(err) => {
                err.log();
                None
            }
        };

        let access_token = match user {
            Some(_) => self
                .factory
                .store()
                .load(client.cookies())
                .ok()
                .flatten()
                .map(|session| session.access_token),
            None => None,
        };

        let writes = client.take_cookie_writes();
        if !writes.is_empty() {
            tracing::debug!(count = writes.len(), "Session cookies updated");
        }
        for cookie in writes {
            request_jar.set(cookie.clone());
            response_cookies.set(cookie);
        }

        RefreshOutcome {
            user,
            access_token,
            response_cookies,
        }
    }
}
