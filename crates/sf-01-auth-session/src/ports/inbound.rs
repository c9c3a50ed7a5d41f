//! Inbound Ports (Driving Ports)

use async_trait::async_trait;
use shared_bus::AuthEvent;
use shared_types::{Session, UserRecord};
use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::{EventOutcome, SessionSnapshot, SessionState};
use crate::error::AuthError;

/// Session controller API (Driving Port)
#[async_trait]
pub trait AuthSessionApi: Send + Sync {
    /// Resolve an existing session at process start.
    ///
    /// Never fails: an unresolvable session means `Unauthenticated`.
    async fn start(&self) -> SessionState;

    /// React to one auth lifecycle event.
    async fn handle_event(&self, event: AuthEvent) -> Result<EventOutcome, AuthError>;

    /// Sign out through the identity provider and clear the session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Current session, if any.
    fn session(&self) -> Option<Session>;

    /// Provisioned account of the current session, if known.
    fn current_account(&self) -> Option<UserRecord>;

    /// Full current snapshot.
    fn snapshot(&self) -> SessionSnapshot;

    /// Listen for session changes.
    fn subscribe(&self) -> watch::Receiver<SessionSnapshot>;
}

#[async_trait]
impl<T: AuthSessionApi + ?Sized> AuthSessionApi for Arc<T> {
    async fn start(&self) -> SessionState {
        (**self).start().await
    }

    async fn handle_event(&self, event: AuthEvent) -> Result<EventOutcome, AuthError> {
        (**self).handle_event(event).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        (**self).sign_out().await
    }

    fn session(&self) -> Option<Session> {
        (**self).session()
    }

    fn current_account(&self) -> Option<UserRecord> {
        (**self).current_account()
    }

    fn snapshot(&self) -> SessionSnapshot {
        (**self).snapshot()
    }

    fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        (**self).subscribe()
    }
}
