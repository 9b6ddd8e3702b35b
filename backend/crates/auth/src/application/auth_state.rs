//! Auth state observer
//!
//! Long-lived consumers (a background worker, a websocket connection, a
//! test harness) watch who is signed in through an [`AuthStateHandle`].
//! One task owns the state: it fetches the current user once and applies
//! every auth change it is told about. Subscribing happens before the
//! fetch starts, so no change can slip between the two; once a change has
//! been applied, a fetch result that arrives later is stale and dropped.

use std::sync::Arc;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;

use platform::cookie::CookieSet;

use crate::application::client::AuthClientFactory;
use crate::application::config::AuthConfig;
use crate::application::event_bus::AuthEventBus;
use crate::domain::entity::{AuthChange, AuthEvent, Session, User};
use crate::domain::provider::IdentityProvider;
use crate::error::AuthResult;

/// Where auth state comes from
#[trait_variant::make(AuthStateSource: Send)]
pub trait LocalAuthStateSource {
    /// Current user, validated by the provider
    async fn get_user(&self) -> AuthResult<Option<User>>;

    /// Subscribe to auth changes from now on
    fn on_auth_state_change(&self) -> broadcast::Receiver<AuthChange>;
}

/// What an observer sees
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSnapshot {
    pub user: Option<User>,
    /// True until the first fetch or change has been applied
    pub loading: bool,
    pub error: Option<String>,
    pub is_authenticated: bool,
}

impl AuthSnapshot {
    fn loading() -> Self {
        Self {
            user: None,
            loading: true,
            error: None,
            is_authenticated: false,
        }
    }

    fn loaded(user: Option<User>) -> Self {
        Self {
            is_authenticated: user.is_some(),
            user,
            loading: false,
            error: None,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            user: None,
            loading: false,
            error: Some(message),
            is_authenticated: false,
        }
    }

    fn from_change(change: &AuthChange) -> Self {
        match change.event {
            AuthEvent::SignedOut => Self::loaded(None),
            _ => Self::loaded(change.user().cloned()),
        }
    }
}

pub struct AuthStateObserver;

impl AuthStateObserver {
    /// Start observing `source`
    pub fn mount<S>(source: Arc<S>) -> AuthStateHandle
    where
        S: AuthStateSource + Send + Sync + 'static,
    {
        let (tx, rx) = watch::channel(AuthSnapshot::loading());
        let mut changes = source.on_auth_state_change();

        let task = tokio::spawn(async move {
            let initial = source.get_user();
            tokio::pin!(initial);

            let mut fetching = true;
            let mut subscribed = true;
            let mut saw_change = false;

            loop {
                tokio::select! {
                    result = &mut initial, if fetching => {
                        fetching = false;
                        if saw_change {
                            tracing::debug!("Discarding stale initial user fetch");
                            continue;
                        }
                        let snapshot = match result {
                            Ok(user) => AuthSnapshot::loaded(user),
                            Err(err) => {
                                err.log();
                                AuthSnapshot::failed(err.user_message())
                            }
                        };
                        tx.send_replace(snapshot);
                    }
                    received = changes.recv(), if subscribed => match received {
                        Ok(change) => {
                            tracing::debug!(event = %change.event, "Auth state changed");
                            saw_change = true;
                            tx.send_replace(AuthSnapshot::from_change(&change));
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Auth state observer lagged behind");
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            subscribed = false;
                        }
                    },
                    else => break,
                }
            }
        });

        AuthStateHandle { rx, task }
    }
}

/// Mounted observer; dropping it stops the observation
pub struct AuthStateHandle {
    rx: watch::Receiver<AuthSnapshot>,
    task: JoinHandle<()>,
}

impl AuthStateHandle {
    pub fn snapshot(&self) -> AuthSnapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next update; false once the observer has stopped
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Wait until the first fetch or change has landed
    pub async fn wait_until_loaded(&mut self) -> AuthSnapshot {
        let waited = self.rx.wait_for(|s| !s.loading).await.map(|s| s.clone());
        match waited {
            Ok(snapshot) => snapshot,
            Err(_) => self.snapshot(),
        }
    }

    pub fn unmount(self) {}
}

impl Drop for AuthStateHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A session that outlives a single request
///
/// Holds its own cookie jar, so it can be driven like a browser: sign in,
/// sign out, and have observers follow along.
pub struct LiveSession<P> {
    factory: AuthClientFactory<P>,
    jar: Mutex<CookieSet>,
    events: AuthEventBus,
}

impl<P> LiveSession<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    pub fn new(provider: Arc<P>, config: Arc<AuthConfig>) -> Self {
        let events = AuthEventBus::default();
        Self {
            factory: AuthClientFactory::new(provider, config).with_event_bus(events.clone()),
            jar: Mutex::new(CookieSet::new()),
            events,
        }
    }

    /// Resume from previously stored cookies
    pub fn with_cookies(self, cookies: CookieSet) -> Self {
        Self {
            jar: Mutex::new(cookies),
            ..self
        }
    }

    pub async fn cookies(&self) -> CookieSet {
        self.jar.lock().await.clone()
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session> {
        let mut jar = self.jar.lock().await;
        let mut client = self.factory.for_request(&jar);
        let result = client.sign_in_with_password(email, password).await;
        jar.merge(client.take_cookie_writes());
        result
    }

    pub async fn sign_out(&self) -> AuthResult<()> {
        let mut jar = self.jar.lock().await;
        let mut client = self.factory.for_request(&jar);
        let result = client.sign_out().await;
        jar.merge(client.take_cookie_writes());
        result
    }
}

impl<P> AuthStateSource for LiveSession<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    async fn get_user(&self) -> AuthResult<Option<User>> {
        let mut jar = self.jar.lock().await;
        let mut client = self.factory.for_request(&jar);
        let result = client.get_user().await;
        jar.merge(client.take_cookie_writes());
        result
    }

    fn on_auth_state_change(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }
}
