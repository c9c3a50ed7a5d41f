//! Error types for the live list subsystem

use shared_types::RemoteError;
use thiserror::Error;

/// Errors returned by [`crate::LiveListCache::load`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Another `load` is still outstanding on this cache.
    #[error("A fetch is already in flight")]
    Busy,

    /// The cache was disposed while the fetch was in flight; the page was
    /// discarded.
    #[error("Fetch completed after the cache was disposed")]
    Stale,

    /// The cache was disposed before the call.
    #[error("Cache is disposed")]
    Disposed,

    /// The list store failed.
    #[error("List store error: {0}")]
    Remote(#[from] RemoteError),
}

impl CacheError {
    /// Metric label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Busy => "busy",
            Self::Stale => "stale",
            Self::Disposed => "disposed",
            Self::Remote(_) => "failed",
        }
    }
}
