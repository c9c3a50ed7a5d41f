//! Session state and its transitions.

use shared_types::{Session, SubjectId, UserRecord};

/// Authentication state exposed to the rest of the application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No session. Initial state.
    #[default]
    Unauthenticated,
    /// A resolved identity-provider session.
    Authenticated(Session),
}

impl SessionState {
    /// The current session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Unauthenticated => None,
        }
    }

    /// Whether a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Subject of the current session.
    #[must_use]
    pub fn subject_id(&self) -> Option<&SubjectId> {
        self.session().map(|s| &s.subject_id)
    }
}

/// Everything the controller publishes on each change.
///
/// `epoch` increases on every transition; background work records the epoch
/// it started under and is discarded if the epoch moved on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current authentication state.
    pub state: SessionState,
    /// Provisioned account of the current session, once known.
    pub account: Option<UserRecord>,
    /// Session generation.
    pub epoch: u64,
}

impl SessionSnapshot {
    /// The current session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.state.session()
    }

    /// Enter `Authenticated` with a freshly resolved session.
    ///
    /// A re-delivered sign-in for the same subject keeps the known account.
    /// Returns the new epoch.
    pub fn authenticate(&mut self, session: Session) -> u64 {
        let same_subject = self.state.subject_id() == Some(&session.subject_id);
        if !same_subject {
            self.account = None;
        }
        self.state = SessionState::Authenticated(session);
        self.epoch += 1;
        self.epoch
    }

    /// Enter `Unauthenticated`, discarding session data.
    pub fn clear(&mut self) {
        self.state = SessionState::Unauthenticated;
        self.account = None;
        self.epoch += 1;
    }

    /// Whether work started under `epoch` for `subject` still applies.
    #[must_use]
    pub fn is_current(&self, epoch: u64, subject: &SubjectId) -> bool {
        self.epoch == epoch && self.state.subject_id() == Some(subject)
    }

    /// Attach a provisioned account if the session it was computed for is
    /// still current. Returns whether the account was applied.
    pub fn attach_account(&mut self, epoch: u64, record: UserRecord) -> bool {
        if !self.is_current(epoch, &record.subject_id) {
            return false;
        }
        self.account = Some(record);
        true
    }
}

/// What handling a single auth event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// `signIn` resolved a session and provisioning was started.
    SignedIn(Session),
    /// `signOut` cleared the session.
    SignedOut,
    /// `signUp`; informational only.
    SignUpNoted,
    /// Unrecognized event name.
    Ignored,
    /// A sign-in resolution completed after the session had already changed.
    Discarded,
}
