//! Cache state.

use shared_types::{ItemId, ListItem, Page, PageToken};
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered, duplicate-free items plus the continuation token of the page
/// they were loaded from.
///
/// `items` is copy-on-write: a snapshot handed out earlier keeps its
/// contents when the state is merged into afterwards.
#[derive(Debug, Clone, Default)]
pub struct CacheState {
    pub(crate) items: Arc<Vec<ListItem>>,
    pub(crate) ids: HashSet<ItemId>,
    pub(crate) next_page_token: Option<PageToken>,
}

impl CacheState {
    /// Build the initial state from a fetched page, keeping server order.
    ///
    /// A page that repeats an id keeps the first occurrence.
    #[must_use]
    pub fn from_page(page: Page<ListItem>) -> Self {
        let mut ids = HashSet::with_capacity(page.items.len());
        let items: Vec<ListItem> = page
            .items
            .into_iter()
            .filter(|item| ids.insert(item.id.clone()))
            .collect();
        Self {
            items: Arc::new(items),
            ids,
            next_page_token: page.next_page_token,
        }
    }

    /// Current items, newest live arrivals first.
    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Shared handle to the current items.
    #[must_use]
    pub fn shared_items(&self) -> Arc<Vec<ListItem>> {
        Arc::clone(&self.items)
    }

    /// Token for the page after the loaded one.
    #[must_use]
    pub fn next_page_token(&self) -> Option<&PageToken> {
        self.next_page_token.as_ref()
    }

    /// Whether an item with this id is cached.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Immutable view of the state.
    #[must_use]
    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            items: self.shared_items(),
            next_page_token: self.next_page_token.clone(),
        }
    }
}

/// What readers of the cache see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    /// Items in display order.
    pub items: Arc<Vec<ListItem>>,
    /// Continuation token of the loaded page.
    pub next_page_token: Option<PageToken>,
}

impl CacheSnapshot {
    /// Ids in display order.
    #[must_use]
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
