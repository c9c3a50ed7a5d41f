//! Outbound Ports (Driven Ports)
//!
//! Both services are opaque; transport and auth protocol are their concern.

use async_trait::async_trait;
use shared_types::{RemoteError, Session, SubjectId, UserRecord};
use std::sync::Arc;

/// Identity provider (Driven Port)
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the currently authenticated session.
    ///
    /// `Ok(None)` means nobody is signed in.
    async fn resolve_current_session(&self) -> Result<Option<Session>, RemoteError>;

    /// End the identity-provider session.
    async fn sign_out(&self) -> Result<(), RemoteError>;
}

/// Identity store (Driven Port)
///
/// `create` MUST fail with `RemoteError::DuplicateKey` when a record for the
/// subject already exists.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Look up a user record by subject.
    async fn find(&self, subject_id: &SubjectId) -> Result<Option<UserRecord>, RemoteError>;

    /// Insert a new user record.
    async fn create(&self, record: UserRecord) -> Result<UserRecord, RemoteError>;
}

#[async_trait]
impl<T: IdentityProvider + ?Sized> IdentityProvider for Arc<T> {
    async fn resolve_current_session(&self) -> Result<Option<Session>, RemoteError> {
        (**self).resolve_current_session().await
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        (**self).sign_out().await
    }
}

#[async_trait]
impl<T: IdentityStore + ?Sized> IdentityStore for Arc<T> {
    async fn find(&self, subject_id: &SubjectId) -> Result<Option<UserRecord>, RemoteError> {
        (**self).find(subject_id).await
    }

    async fn create(&self, record: UserRecord) -> Result<UserRecord, RemoteError> {
        (**self).create(record).await
    }
}
