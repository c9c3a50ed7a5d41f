//! Live creation feed
//!
//! Drains a [`CreatedStream`] into a cache in delivery order. Releasing or
//! dropping the feed ends the subscription.

use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::domain::MergeOutcome;
use crate::ports::{CreatedStream, ListStore, LiveListApi};
use crate::service::LiveListCache;
use crate::SUBSYSTEM;

/// Background task feeding live creation events into a cache.
pub struct LiveFeed {
    task: Option<JoinHandle<usize>>,
}

impl LiveFeed {
    /// Start draining `stream` into `cache`.
    ///
    /// The task ends when the stream ends, the cache is disposed, or the
    /// feed is released.
    pub fn spawn<C>(cache: C, mut stream: CreatedStream) -> Self
    where
        C: LiveListApi + 'static,
    {
        let task = tokio::spawn(async move {
            let mut applied = 0usize;
            while let Some(item) = stream.next().await {
                match cache.apply_created(item) {
                    MergeOutcome::Applied => applied += 1,
                    MergeOutcome::Duplicate => {}
                    MergeOutcome::Disposed => {
                        debug!(subsystem = SUBSYSTEM, "Cache disposed, live feed stopping");
                        break;
                    }
                }
            }
            applied
        });
        info!(subsystem = SUBSYSTEM, "Live feed subscribed");
        Self { task: Some(task) }
    }

    /// Subscribe `cache` to its own store's creation stream.
    pub fn attach<S>(cache: &LiveListCache<S>) -> Self
    where
        S: ListStore + 'static,
    {
        let stream = cache.store().subscribe_created();
        Self::spawn(cache.clone(), stream)
    }

    /// Whether the feed task is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the feed and wait until it can no longer merge.
    ///
    /// Returns how many items the feed applied.
    pub async fn release(mut self) -> usize {
        let Some(task) = self.task.take() else {
            return 0;
        };
        task.abort();
        let applied = task.await.unwrap_or(0);
        info!(subsystem = SUBSYSTEM, applied, "Live feed released");
        applied
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::channel::mpsc;
    use shared_types::{ItemId, ListFilter, ListItem, NewListItem, Page, PageToken, RemoteError};
    use std::time::Duration;
    use tokio::time::timeout;

    fn item(id: &str) -> ListItem {
        ListItem::new(ItemId::new(id), format!("market {id}"), "alice")
    }

    struct EmptyStore;

    #[async_trait]
    impl ListStore for EmptyStore {
        async fn query(
            &self,
            _filter: Option<&ListFilter>,
            _page_token: Option<&PageToken>,
        ) -> Result<Page<ListItem>, RemoteError> {
            Ok(Page::empty())
        }

        fn subscribe_created(&self) -> CreatedStream {
            Box::pin(futures::stream::empty())
        }

        async fn create(&self, _draft: NewListItem) -> Result<ListItem, RemoteError> {
            Err(RemoteError::Rejected("read-only".into()))
        }
    }

    async fn wait_for_len(cache: &LiveListCache<EmptyStore>, len: usize) {
        timeout(Duration::from_secs(1), async {
            while cache.items().len() < len {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("items merged");
    }

    #[tokio::test]
    async fn test_feed_merges_in_delivery_order() {
        let cache = LiveListCache::new(EmptyStore);
        let (tx, rx) = mpsc::unbounded();
        let feed = LiveFeed::spawn(cache.clone(), Box::pin(rx));

        for id in ["a", "b", "a", "c"] {
            tx.unbounded_send(item(id)).unwrap();
        }
        wait_for_len(&cache, 3).await;

        let ids: Vec<_> = cache.items().iter().map(|i| i.id.to_string()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
        assert_eq!(feed.release().await, 0);
    }

    #[tokio::test]
    async fn test_released_feed_stops_merging() {
        let cache = LiveListCache::new(EmptyStore);
        let (tx, rx) = mpsc::unbounded();
        let feed = LiveFeed::spawn(cache.clone(), Box::pin(rx));

        tx.unbounded_send(item("a")).unwrap();
        wait_for_len(&cache, 1).await;
        feed.release().await;

        assert!(tx.unbounded_send(item("b")).is_err());
        assert_eq!(cache.items().len(), 1);
    }

    #[tokio::test]
    async fn test_feed_stops_when_cache_disposed() {
        let cache = LiveListCache::new(EmptyStore);
        let (tx, rx) = mpsc::unbounded();
        let feed = LiveFeed::spawn(cache.clone(), Box::pin(rx));

        cache.dispose();
        tx.unbounded_send(item("a")).unwrap();

        timeout(Duration::from_secs(1), async {
            while feed.is_active() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("feed stopped");
        assert!(cache.items().is_empty());
    }

    #[tokio::test]
    async fn test_feed_counts_applied_items_when_stream_ends() {
        let cache = LiveListCache::new(EmptyStore);
        let stream = futures::stream::iter(vec![item("a"), item("a"), item("b")]);
        let feed = LiveFeed::spawn(cache.clone(), Box::pin(stream));

        timeout(Duration::from_secs(1), async {
            while feed.is_active() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("stream drained");

        assert_eq!(feed.release().await, 2);
    }
}
