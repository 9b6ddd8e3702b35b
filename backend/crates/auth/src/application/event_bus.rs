//! Auth state change broadcast

use tokio::sync::broadcast;

use crate::domain::entity::AuthChange;

const DEFAULT_CAPACITY: usize = 16;

/// Fan-out of [`AuthChange`] notifications
#[derive(Debug, Clone)]
pub struct AuthEventBus {
    tx: broadcast::Sender<AuthChange>,
}

impl Default for AuthEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl AuthEventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Send to current subscribers; a bus nobody listens to drops the event
    pub fn publish(&self, change: AuthChange) {
        let event = change.event;
        if self.tx.send(change).is_err() {
            tracing::trace!(%event, "No auth state subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
