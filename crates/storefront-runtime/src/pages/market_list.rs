//! # Market List Page
//!
//! ```text
//! mount:   LiveFeed::attach → load(filter)
//! search:  SearchForm::run over the cached items
//! unmount: LiveFeed::release → dispose
//! ```
//!
//! The feed is attached before the fetch so creations that happen while the
//! page loads are not missed.

use shared_types::{ListFilter, ListItem};
use sf_02_live_list::{CacheError, ListStore, LiveFeed, LiveListApi, LiveListCache};
use sf_03_search::{DisplayMode, SearchForm};
use storefront_telemetry::{log_event, subsystem_span};
use tracing::Instrument;

const SUBSYSTEM: &str = "market-list";

/// What the page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketListView {
    pub heading: DisplayMode,
    pub markets: Vec<ListItem>,
}

/// A mounted market list.
pub struct MarketListPage<S: ListStore + 'static> {
    cache: LiveListCache<S>,
    feed: Option<LiveFeed>,
    search: SearchForm,
}

impl<S: ListStore + 'static> MarketListPage<S> {
    /// Subscribe to creations and fetch the first page.
    ///
    /// A failed fetch tears the page down again before returning.
    pub async fn mount(store: S, filter: ListFilter) -> Result<Self, CacheError> {
        let cache = LiveListCache::new(store);
        let feed = LiveFeed::attach(&cache);

        let loaded = cache
            .load(Some(filter), None)
            .instrument(subsystem_span!("market_list_mount", subsystem = SUBSYSTEM))
            .await;

        match loaded {
            Ok(snapshot) => {
                log_event!(info, SUBSYSTEM, "Market list mounted", markets = snapshot.len());
                Ok(Self {
                    cache,
                    feed: Some(feed),
                    search: SearchForm::new(),
                })
            }
            Err(e) => {
                log_event!(warn, SUBSYSTEM, "Market list failed to load", error = %e);
                feed.release().await;
                cache.dispose();
                Err(e)
            }
        }
    }

    /// The page's cache.
    pub fn cache(&self) -> &LiveListCache<S> {
        &self.cache
    }

    /// Run a search over the cached markets. Returns the number of hits.
    pub fn search(&mut self, term: &str) -> usize {
        self.search.set_term(term);
        let items = self.cache.items();
        self.search.run(&items)
    }

    /// Drop the search and show every market again.
    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    pub fn search_form(&self) -> &SearchForm {
        &self.search
    }

    /// Current view: search hits if any, otherwise every cached market.
    pub fn view(&self) -> MarketListView {
        let items = self.cache.items();
        let display = self.search.display(&items);
        MarketListView {
            heading: display.mode,
            markets: display.items.to_vec(),
        }
    }

    /// Release the live subscription and dispose the cache.
    pub async fn unmount(mut self) {
        let applied = match self.feed.take() {
            Some(feed) => feed.release().await,
            None => 0,
        };
        self.cache.dispose();
        log_event!(info, SUBSYSTEM, "Market list unmounted", live_merges = applied);
    }
}
