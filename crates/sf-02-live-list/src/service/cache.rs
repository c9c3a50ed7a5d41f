//! Live List Cache Service
//!
//! Owns one cache instance: a single in-flight fetch plus sequential
//! application of live creation events.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{ListFilter, ListItem, PageToken};
use std::sync::Arc;
use storefront_telemetry::{CACHE_FETCHES, CACHE_MERGES, CACHE_SIZE};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::{CacheSnapshot, CacheState, MergeOutcome};
use crate::error::CacheError;
use crate::ports::{LiveListApi, ListStore};
use crate::SUBSYSTEM;

#[derive(Default)]
struct Shared {
    state: CacheState,
    /// `Some` while a fetch is outstanding; holds live items merged
    /// meanwhile so the fetched page does not drop them.
    in_flight: Option<Vec<ListItem>>,
    disposed: bool,
}

struct Inner<S> {
    store: S,
    shared: Mutex<Shared>,
    changes: watch::Sender<CacheSnapshot>,
}

impl<S> Inner<S> {
    /// Publish the current state. Called with the lock held so listeners
    /// observe changes in application order.
    fn publish(&self, shared: &Shared) -> CacheSnapshot {
        let snapshot = shared.state.snapshot();
        CACHE_SIZE.set(snapshot.len() as f64);
        self.changes.send_replace(snapshot.clone());
        snapshot
    }
}

/// Clears the in-flight marker if a `load` future is dropped before it
/// completes.
struct FetchGuard<'a, S> {
    inner: &'a Inner<S>,
    armed: bool,
}

impl<S> Drop for FetchGuard<'_, S> {
    fn drop(&mut self) {
        if self.armed {
            self.inner.shared.lock().in_flight = None;
        }
    }
}

/// Read-through cache over a [`ListStore`].
///
/// Cheap to clone; clones share the same cache.
pub struct LiveListCache<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for LiveListCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ListStore> LiveListCache<S> {
    /// Create an empty cache.
    pub fn new(store: S) -> Self {
        let (changes, _) = watch::channel(CacheSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                store,
                shared: Mutex::new(Shared::default()),
                changes,
            }),
        }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// Whether a fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.inner.shared.lock().in_flight.is_some()
    }

    fn begin_fetch(&self) -> Result<FetchGuard<'_, S>, CacheError> {
        let mut shared = self.inner.shared.lock();
        if shared.disposed {
            return Err(CacheError::Disposed);
        }
        if shared.in_flight.is_some() {
            return Err(CacheError::Busy);
        }
        shared.in_flight = Some(Vec::new());
        Ok(FetchGuard {
            inner: &self.inner,
            armed: true,
        })
    }
}

#[async_trait]
impl<S: ListStore + 'static> LiveListApi for LiveListCache<S> {
    async fn load(
        &self,
        filter: Option<ListFilter>,
        page_token: Option<PageToken>,
    ) -> Result<CacheSnapshot, CacheError> {
        let mut guard = match self.begin_fetch() {
            Ok(guard) => guard,
            Err(e) => {
                debug!(subsystem = SUBSYSTEM, error = %e, "Fetch rejected");
                CACHE_FETCHES.with_label_values(&[e.label()]).inc();
                return Err(e);
            }
        };

        let result = self
            .inner
            .store
            .query(filter.as_ref(), page_token.as_ref())
            .await;

        let mut shared = self.inner.shared.lock();
        guard.armed = false;
        let merged_during_fetch = shared.in_flight.take().unwrap_or_default();

        if shared.disposed {
            debug!(subsystem = SUBSYSTEM, "Fetch completed after dispose; discarded");
            CACHE_FETCHES.with_label_values(&["stale"]).inc();
            return Err(CacheError::Stale);
        }

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                warn!(subsystem = SUBSYSTEM, error = %e, "Fetch failed");
                CACHE_FETCHES.with_label_values(&["failed"]).inc();
                return Err(CacheError::Remote(e));
            }
        };

        let fetched = page.items.len();
        let mut state = CacheState::from_page(page);
        for item in merged_during_fetch {
            state.apply_created(item);
        }
        shared.state = state;
        let snapshot = self.inner.publish(&shared);

        info!(
            subsystem = SUBSYSTEM,
            fetched,
            cached = snapshot.len(),
            has_more = snapshot.next_page_token.is_some(),
            "Page loaded"
        );
        CACHE_FETCHES.with_label_values(&["loaded"]).inc();
        Ok(snapshot)
    }

    fn apply_created(&self, item: ListItem) -> MergeOutcome {
        let mut shared = self.inner.shared.lock();
        let item_id = item.id.clone();

        let outcome = if shared.disposed {
            MergeOutcome::Disposed
        } else {
            let outcome = shared.state.apply_created(item.clone());
            if outcome.is_applied() {
                if let Some(pending) = shared.in_flight.as_mut() {
                    pending.push(item);
                }
            }
            outcome
        };

        if outcome.is_applied() {
            self.inner.publish(&shared);
        }
        drop(shared);

        debug!(
            subsystem = SUBSYSTEM,
            item_id = %item_id,
            outcome = outcome.label(),
            "Live creation merged"
        );
        CACHE_MERGES.with_label_values(&[outcome.label()]).inc();
        outcome
    }

    fn items(&self) -> Arc<Vec<ListItem>> {
        self.inner.shared.lock().state.shared_items()
    }

    fn next_page_token(&self) -> Option<PageToken> {
        self.inner.shared.lock().state.next_page_token().cloned()
    }

    fn subscribe(&self) -> watch::Receiver<CacheSnapshot> {
        self.inner.changes.subscribe()
    }

    fn dispose(&self) {
        let mut shared = self.inner.shared.lock();
        if !shared.disposed {
            shared.disposed = true;
            info!(
                subsystem = SUBSYSTEM,
                fetch_pending = shared.in_flight.is_some(),
                "Cache disposed"
            );
        }
    }

    fn is_disposed(&self) -> bool {
        self.inner.shared.lock().disposed
    }
}
