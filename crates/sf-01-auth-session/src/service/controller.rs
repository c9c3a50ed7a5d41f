//! Auth Session Controller
//!
//! Orchestrates session transitions and background provisioning.

use async_trait::async_trait;
use shared_bus::AuthEvent;
use shared_types::{Session, SubjectId, UserRecord};
use std::sync::Arc;
use storefront_telemetry::{PROVISIONING_DURATION, PROVISIONING_OUTCOMES, SESSION_TRANSITIONS};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{
    classify_create, classify_lookup, EventOutcome, ProvisioningOutcome, SessionSnapshot,
    SessionState,
};
use crate::error::AuthError;
use crate::ports::{AuthSessionApi, IdentityProvider, IdentityStore};
use crate::SUBSYSTEM;

/// Handle to a background provisioning run.
///
/// Dropping the handle detaches the task; it still completes and applies
/// (or discards) its result.
pub struct ProvisioningHandle {
    task: JoinHandle<ProvisioningOutcome>,
}

impl ProvisioningHandle {
    /// Wait for the provisioning run to finish.
    pub async fn outcome(self) -> ProvisioningOutcome {
        self.task.await.unwrap_or_else(|e| {
            warn!(subsystem = SUBSYSTEM, error = %e, "Provisioning task did not complete");
            ProvisioningOutcome::Aborted
        })
    }

    /// Whether the run has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

struct Inner<P, S> {
    provider: P,
    store: S,
    state: watch::Sender<SessionSnapshot>,
}

/// Session controller implementing `AuthSessionApi`.
///
/// Cheap to clone; clones share state.
pub struct AuthSessionController<P, S> {
    inner: Arc<Inner<P, S>>,
}

impl<P, S> Clone for AuthSessionController<P, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, S> AuthSessionController<P, S>
where
    P: IdentityProvider + 'static,
    S: IdentityStore + 'static,
{
    /// Create a controller in the `Unauthenticated` state.
    pub fn new(provider: P, store: S) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                provider,
                store,
                state,
            }),
        }
    }

    /// Handle one auth event and hand back the provisioning run it started.
    ///
    /// `handle_event` is this without the handle.
    pub async fn dispatch(
        &self,
        event: AuthEvent,
    ) -> Result<(EventOutcome, Option<ProvisioningHandle>), AuthError> {
        match event {
            AuthEvent::SignIn(_) => self.on_sign_in().await,
            AuthEvent::SignUp(_) => {
                info!(subsystem = SUBSYSTEM, "User signed up");
                SESSION_TRANSITIONS
                    .with_label_values(&["signUp", "ignored"])
                    .inc();
                Ok((EventOutcome::SignUpNoted, None))
            }
            AuthEvent::SignOut => {
                self.clear_session("signOut");
                Ok((EventOutcome::SignedOut, None))
            }
            AuthEvent::Unknown(name) => {
                debug!(subsystem = SUBSYSTEM, event = %name, "Ignoring unrecognized auth event");
                SESSION_TRANSITIONS
                    .with_label_values(&["unknown", "ignored"])
                    .inc();
                Ok((EventOutcome::Ignored, None))
            }
        }
    }

    async fn on_sign_in(&self) -> Result<(EventOutcome, Option<ProvisioningHandle>), AuthError> {
        let started_epoch = self.inner.state.borrow().epoch;

        let session = match self.inner.provider.resolve_current_session().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                warn!(subsystem = SUBSYSTEM, "signIn received but no session resolved");
                SESSION_TRANSITIONS
                    .with_label_values(&["signIn", "failed"])
                    .inc();
                return Err(AuthError::SessionUnavailable);
            }
            Err(e) => {
                warn!(subsystem = SUBSYSTEM, error = %e, "Session resolution failed");
                SESSION_TRANSITIONS
                    .with_label_values(&["signIn", "failed"])
                    .inc();
                return Err(AuthError::Resolution(e));
            }
        };

        let mut epoch = None;
        self.inner.state.send_if_modified(|snapshot| {
            if snapshot.epoch != started_epoch {
                return false;
            }
            epoch = Some(snapshot.authenticate(session.clone()));
            true
        });

        let Some(epoch) = epoch else {
            debug!(
                subsystem = SUBSYSTEM,
                subject_id = %session.subject_id,
                "Session changed while resolving; sign-in discarded"
            );
            SESSION_TRANSITIONS
                .with_label_values(&["signIn", "discarded"])
                .inc();
            return Ok((EventOutcome::Discarded, None));
        };

        info!(
            subsystem = SUBSYSTEM,
            subject_id = %session.subject_id,
            epoch,
            "Signed in"
        );
        SESSION_TRANSITIONS
            .with_label_values(&["signIn", "applied"])
            .inc();

        let inner = Arc::clone(&self.inner);
        let provisioned = session.clone();
        let task = tokio::spawn(async move { inner.provision(provisioned, epoch).await });

        Ok((EventOutcome::SignedIn(session), Some(ProvisioningHandle { task })))
    }

    fn clear_session(&self, trigger: &'static str) {
        let mut previous = None;
        self.inner.state.send_modify(|snapshot| {
            previous = snapshot.state.subject_id().cloned();
            snapshot.clear();
        });
        info!(
            subsystem = SUBSYSTEM,
            trigger,
            subject_id = ?previous.as_ref().map(SubjectId::as_str),
            "Signed out"
        );
        SESSION_TRANSITIONS
            .with_label_values(&[trigger, "applied"])
            .inc();
    }
}

impl<P, S> Inner<P, S>
where
    P: IdentityProvider,
    S: IdentityStore,
{
    fn is_current(&self, epoch: u64, subject: &SubjectId) -> bool {
        self.state.borrow().is_current(epoch, subject)
    }

    /// Check-then-create for the session's subject.
    async fn provision(&self, session: Session, epoch: u64) -> ProvisioningOutcome {
        let _timer = PROVISIONING_DURATION.start_timer();
        let subject = session.subject_id.clone();

        let outcome = match classify_lookup(self.store.find(&subject).await) {
            Ok(Some(existing)) => existing,
            Ok(None) if !self.is_current(epoch, &subject) => ProvisioningOutcome::Stale,
            Ok(None) => {
                let record = UserRecord::from_session(&session);
                match classify_create(self.store.create(record).await) {
                    ProvisioningOutcome::DuplicateIgnored { .. } => {
                        // Lost the race; pick up the winner's record.
                        let record = self.store.find(&subject).await.ok().flatten();
                        ProvisioningOutcome::DuplicateIgnored { record }
                    }
                    other => other,
                }
            }
            Err(failed) => failed,
        };

        self.apply(epoch, &subject, outcome)
    }

    /// Apply a provisioning result, or discard it if the session moved on.
    fn apply(
        &self,
        epoch: u64,
        subject: &SubjectId,
        outcome: ProvisioningOutcome,
    ) -> ProvisioningOutcome {
        let current = match outcome.record().cloned() {
            Some(record) => self
                .state
                .send_if_modified(|snapshot| snapshot.attach_account(epoch, record)),
            None => self.is_current(epoch, subject),
        };
        let outcome = if current {
            outcome
        } else {
            ProvisioningOutcome::Stale
        };

        match &outcome {
            ProvisioningOutcome::Created(_) => {
                info!(subsystem = SUBSYSTEM, subject_id = %subject, "User record created");
            }
            ProvisioningOutcome::AlreadyProvisioned(_) => {
                debug!(subsystem = SUBSYSTEM, subject_id = %subject, "User record already exists");
            }
            ProvisioningOutcome::DuplicateIgnored { .. } => {
                info!(
                    subsystem = SUBSYSTEM,
                    subject_id = %subject,
                    "Concurrent provisioning created the record first; duplicate ignored"
                );
            }
            ProvisioningOutcome::Failed(e) => {
                warn!(
                    subsystem = SUBSYSTEM,
                    subject_id = %subject,
                    error = %e,
                    "Provisioning failed; will retry at next sign-in"
                );
            }
            ProvisioningOutcome::Stale | ProvisioningOutcome::Aborted => {
                debug!(
                    subsystem = SUBSYSTEM,
                    subject_id = %subject,
                    epoch,
                    "Provisioning result discarded; session changed"
                );
            }
        }
        PROVISIONING_OUTCOMES
            .with_label_values(&[outcome.label()])
            .inc();

        outcome
    }
}

#[async_trait]
impl<P, S> AuthSessionApi for AuthSessionController<P, S>
where
    P: IdentityProvider + 'static,
    S: IdentityStore + 'static,
{
    async fn start(&self) -> SessionState {
        let started_epoch = self.inner.state.borrow().epoch;

        let resolved = match self.inner.provider.resolve_current_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!(subsystem = SUBSYSTEM, error = %e, "No existing session at start");
                None
            }
        };

        // A hub event handled while resolving owns the state now.
        let mut superseded = false;
        self.inner.state.send_if_modified(|snapshot| {
            if snapshot.epoch != started_epoch {
                superseded = true;
                return false;
            }
            match resolved {
                Some(session) => {
                    snapshot.authenticate(session);
                    true
                }
                None if snapshot.state.is_authenticated() => {
                    snapshot.clear();
                    true
                }
                None => false,
            }
        });

        let state = self.inner.state.borrow().state.clone();
        info!(
            subsystem = SUBSYSTEM,
            authenticated = state.is_authenticated(),
            superseded,
            "Session controller started"
        );
        let outcome = if superseded { "discarded" } else { "applied" };
        SESSION_TRANSITIONS
            .with_label_values(&["start", outcome])
            .inc();
        state
    }

    async fn handle_event(&self, event: AuthEvent) -> Result<EventOutcome, AuthError> {
        self.dispatch(event).await.map(|(outcome, _)| outcome)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Err(e) = self.inner.provider.sign_out().await {
            warn!(subsystem = SUBSYSTEM, error = %e, "Error signing out user");
            SESSION_TRANSITIONS
                .with_label_values(&["signOutCall", "failed"])
                .inc();
            return Err(AuthError::SignOutFailed(e));
        }
        self.clear_session("signOutCall");
        Ok(())
    }

    fn session(&self) -> Option<Session> {
        self.inner.state.borrow().session().cloned()
    }

    fn current_account(&self) -> Option<UserRecord> {
        self.inner.state.borrow().account.clone()
    }

    fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.state.subscribe()
    }
}
