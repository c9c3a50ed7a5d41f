//! Error types for the auth session subsystem

use shared_types::RemoteError;
use thiserror::Error;

/// Errors surfaced to callers of the session controller.
///
/// All of them are recoverable: the controller is never left half-transitioned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The identity provider reported no current session after `signIn`.
    #[error("No identity-provider session available")]
    SessionUnavailable,

    /// Resolving the identity-provider session failed.
    #[error("Session resolution failed: {0}")]
    Resolution(RemoteError),

    /// The identity provider rejected the sign-out request.
    #[error("Sign-out failed: {0}")]
    SignOutFailed(RemoteError),
}
