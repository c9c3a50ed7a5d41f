//! Inbound Ports (Driving Ports)

use async_trait::async_trait;
use shared_types::{ListFilter, ListItem, PageToken};
use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::{CacheSnapshot, MergeOutcome};
use crate::error::CacheError;

/// Live list cache API (Driving Port)
#[async_trait]
pub trait LiveListApi: Send + Sync {
    /// Fetch a page and make it the cache contents.
    ///
    /// At most one call may be outstanding; a second concurrent call fails
    /// with [`CacheError::Busy`] and leaves the first one undisturbed.
    async fn load(
        &self,
        filter: Option<ListFilter>,
        page_token: Option<PageToken>,
    ) -> Result<CacheSnapshot, CacheError>;

    /// Merge one live creation event.
    fn apply_created(&self, item: ListItem) -> MergeOutcome;

    /// Current items. Later merges do not change a returned snapshot.
    fn items(&self) -> Arc<Vec<ListItem>>;

    /// Continuation token of the loaded page.
    fn next_page_token(&self) -> Option<PageToken>;

    /// Listen for cache changes.
    fn subscribe(&self) -> watch::Receiver<CacheSnapshot>;

    /// Tear the cache down. Later merges are ignored and an outstanding
    /// fetch is discarded.
    fn dispose(&self);

    /// Whether `dispose` was called.
    fn is_disposed(&self) -> bool;
}
