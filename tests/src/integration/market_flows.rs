//! # Market List Flows
//!
//! Tests that the list store's creation stream, the live list cache and
//! the search overlay work together the way a mounted page uses them.
//!
//! ## Flows Tested:
//!
//! 1. **List Store → Live Cache (2)**: creations reach every mounted cache, newest first
//! 2. **Fetch in flight**: concurrent loads are `Busy`, live items survive the page swap
//! 3. **Live Cache (2) → Search (3)**: results overlay the cache, empty results fall back

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio::time::timeout;

    // Shared infrastructure
    use shared_bus::InMemoryEventBus;
    use shared_types::{
        ItemId, ListFilter, ListItem, NewListItem, Page, PageToken, RemoteError, Session,
        SubjectId,
    };

    // Subsystem 2: Live List
    use sf_02_live_list::{
        CacheError, CreatedStream, ListStore, LiveFeed, LiveListApi, LiveListCache, MergeOutcome,
    };

    // Subsystem 3: Search
    use sf_03_search::{display_items, DisplayMode, SearchQuery};

    // Runtime wiring
    use storefront_runtime::adapters::InMemoryBackend;
    use storefront_runtime::market::{create_market, MarketDraft};
    use storefront_runtime::pages::MarketListPage;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn alice() -> Session {
        Session::new(SubjectId::new("sub-alice"), "alice", "alice@example.com")
    }

    fn seeded_backend() -> Arc<InMemoryBackend> {
        let backend = Arc::new(InMemoryBackend::new(Arc::new(InMemoryEventBus::new())));
        backend.seed_markets([
            ListItem::new(ItemId::new("m1"), "Pottery Barn", "bob").with_tags(["Crafts"]),
            ListItem::new(ItemId::new("m2"), "Book Nook", "carol").with_tags(["Books"]),
        ]);
        backend
    }

    async fn wait_for_len<C: LiveListApi>(cache: &C, len: usize) {
        timeout(Duration::from_secs(1), async {
            while cache.items().len() < len {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("live creation merged");
    }

    fn names(items: &[ListItem]) -> Vec<&str> {
        items.iter().map(|item| item.name.as_str()).collect()
    }

    /// List store whose query result is held back until the test releases it.
    ///
    /// The page is read before parking, so creations made meanwhile are not
    /// part of it.
    struct SlowListStore {
        backend: Arc<InMemoryBackend>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl ListStore for SlowListStore {
        async fn query(
            &self,
            filter: Option<&ListFilter>,
            page_token: Option<&PageToken>,
        ) -> Result<Page<ListItem>, RemoteError> {
            let page = self.backend.query(filter, page_token).await;
            self.release.notified().await;
            page
        }

        fn subscribe_created(&self) -> CreatedStream {
            self.backend.subscribe_created()
        }

        async fn create(&self, item: NewListItem) -> Result<ListItem, RemoteError> {
            ListStore::create(self.backend.as_ref(), item).await
        }
    }

    // =============================================================================
    // INTEGRATION TESTS: LIST STORE → LIVE CACHE
    // =============================================================================

    /// Test that a creation reaches every mounted page exactly once
    #[tokio::test]
    async fn test_creation_reaches_every_mounted_page() {
        let backend = seeded_backend();
        let first = MarketListPage::mount(Arc::clone(&backend), ListFilter::default())
            .await
            .unwrap();
        let second = MarketListPage::mount(Arc::clone(&backend), ListFilter::default())
            .await
            .unwrap();

        let created = create_market(
            backend.as_ref(),
            &alice(),
            MarketDraft::new("  Candle Co  ").with_tags(["Home"]),
        )
        .await
        .unwrap();
        assert_eq!(created.name, "Candle Co");
        assert_eq!(created.owner, "alice");

        wait_for_len(first.cache(), 3).await;
        wait_for_len(second.cache(), 3).await;
        for page in [&first, &second] {
            let items = page.cache().items();
            assert_eq!(names(&items), vec!["Candle Co", "Pottery Barn", "Book Nook"]);
        }

        // Redelivery of the same creation is a no-op.
        assert_eq!(first.cache().apply_created(created), MergeOutcome::Duplicate);
        assert_eq!(first.cache().items().len(), 3);

        first.unmount().await;
        second.unmount().await;
    }

    /// Test that an unmounted page stops merging while others keep going
    #[tokio::test]
    async fn test_unmounted_page_stops_merging() {
        let backend = seeded_backend();
        let staying = MarketListPage::mount(Arc::clone(&backend), ListFilter::default())
            .await
            .unwrap();
        let leaving = MarketListPage::mount(Arc::clone(&backend), ListFilter::default())
            .await
            .unwrap();
        let leaving_cache = leaving.cache().clone();
        leaving.unmount().await;

        create_market(backend.as_ref(), &alice(), MarketDraft::new("Tea House"))
            .await
            .unwrap();
        wait_for_len(staying.cache(), 3).await;

        assert!(leaving_cache.is_disposed());
        assert_eq!(leaving_cache.items().len(), 2);
        assert!(matches!(
            leaving_cache.load(None, None).await,
            Err(CacheError::Disposed)
        ));

        staying.unmount().await;
    }

    // =============================================================================
    // INTEGRATION TESTS: FETCH IN FLIGHT
    // =============================================================================

    /// Test that a second load is Busy and live items survive the page swap
    #[tokio::test]
    async fn test_live_creation_during_fetch_survives() {
        let backend = seeded_backend();
        let release = Arc::new(Notify::new());
        let cache = LiveListCache::new(SlowListStore {
            backend: Arc::clone(&backend),
            release: Arc::clone(&release),
        });
        let feed = LiveFeed::attach(&cache);

        let (loaded, busy) = tokio::join!(cache.load(None, None), async {
            timeout(Duration::from_secs(1), async {
                while !cache.is_loading() {
                    tokio::task::yield_now().await;
                }
            })
            .await
            .expect("fetch started");

            let busy = cache.load(None, None).await;

            create_market(backend.as_ref(), &alice(), MarketDraft::new("Late Arrival"))
                .await
                .unwrap();
            wait_for_len(&cache, 1).await;

            release.notify_one();
            busy
        });

        assert!(matches!(busy, Err(CacheError::Busy)));
        let snapshot = loaded.unwrap();
        assert_eq!(
            names(&snapshot.items),
            vec!["Late Arrival", "Pottery Barn", "Book Nook"]
        );
        assert!(!cache.is_loading());
        assert_eq!(feed.release().await, 1);
    }

    // =============================================================================
    // INTEGRATION TESTS: LIVE CACHE → SEARCH
    // =============================================================================

    /// Test that search results overlay the cache and fall back when empty
    #[tokio::test]
    async fn test_search_overlays_live_cache() {
        let backend = seeded_backend();
        let mut page = MarketListPage::mount(Arc::clone(&backend), ListFilter::default())
            .await
            .unwrap();

        create_market(
            backend.as_ref(),
            &alice(),
            MarketDraft::new("Craft Beer Hall").with_tags(["Food"]),
        )
        .await
        .unwrap();
        wait_for_len(page.cache(), 3).await;

        // "craft" hits a name and a tag, in cache order.
        assert_eq!(page.search("  CRAFT "), 2);
        let view = page.view();
        assert_eq!(view.heading, DisplayMode::Results(2));
        assert_eq!(names(&view.markets), vec!["Craft Beer Hall", "Pottery Barn"]);

        assert_eq!(page.search("zzz"), 0);
        let view = page.view();
        assert_eq!(view.heading, DisplayMode::All);
        assert_eq!(view.markets.len(), 3);

        page.clear_search();
        assert_eq!(page.view().markets.len(), 3);
        page.unmount().await;
    }

    /// Test that the pure filter and display fallback agree with the page
    #[tokio::test]
    async fn test_filter_over_cache_snapshot() {
        let backend = seeded_backend();
        let cache = LiveListCache::new(Arc::clone(&backend));
        let snapshot = cache.load(None, None).await.unwrap();

        let books = SearchQuery::new("books").apply(&snapshot.items);
        let display = display_items(&snapshot.items, &books);
        assert_eq!(display.mode, DisplayMode::Results(1));
        assert_eq!(names(display.items), vec!["Book Nook"]);

        let none = SearchQuery::new("").apply(&snapshot.items);
        let display = display_items(&snapshot.items, &none);
        assert_eq!(display.mode, DisplayMode::All);
        assert_eq!(display.items.len(), 2);
    }
}
