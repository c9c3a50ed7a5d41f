//! # Error Types
//!
//! Defines the failure taxonomy of the remote services every subsystem
//! consumes (identity store, list store, payment gateway).

use thiserror::Error;

/// Errors returned by remote stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Network or service failure. Retried by the caller at the next
    /// natural trigger, never internally.
    #[error("Transient remote error: {0}")]
    Transient(String),

    /// A record with this key already exists.
    #[error("Duplicate key: {key}")]
    DuplicateKey { key: String },

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request was rejected by the service.
    #[error("Rejected: {0}")]
    Rejected(String),
}

impl RemoteError {
    /// Whether this error reports a uniqueness collision.
    #[must_use]
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }

    /// Whether retrying later could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
