//! Live creation merge.

use shared_types::ListItem;
use std::sync::Arc;

use super::state::CacheState;

/// Result of merging one live creation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The item was prepended.
    Applied,
    /// The id was already cached; nothing changed.
    Duplicate,
    /// The owning cache was disposed; nothing changed.
    Disposed,
}

impl MergeOutcome {
    /// Metric label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Duplicate => "duplicate",
            Self::Disposed => "disposed",
        }
    }

    /// Whether the cache changed.
    #[must_use]
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

impl CacheState {
    /// Prepend a newly created item unless its id is already cached.
    ///
    /// Items already in the cache keep their relative order.
    pub fn apply_created(&mut self, item: ListItem) -> MergeOutcome {
        if !self.ids.insert(item.id.clone()) {
            return MergeOutcome::Duplicate;
        }
        Arc::make_mut(&mut self.items).insert(0, item);
        MergeOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::{ItemId, Page};
    use std::collections::HashSet;

    fn item(id: &str) -> ListItem {
        ListItem::new(ItemId::new(id), format!("market {id}"), "alice")
    }

    fn loaded(ids: &[&str]) -> CacheState {
        CacheState::from_page(Page {
            items: ids.iter().map(|id| item(id)).collect(),
            next_page_token: None,
        })
    }

    #[test]
    fn test_created_item_prepended() {
        let mut state = loaded(&["a", "b", "c"]);

        assert_eq!(state.apply_created(item("d")), MergeOutcome::Applied);

        let ids: Vec<_> = state.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn test_item_already_in_page_is_duplicate() {
        let mut state = loaded(&["a", "b"]);
        let before = state.snapshot();

        assert_eq!(state.apply_created(item("b")), MergeOutcome::Duplicate);
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_earlier_snapshot_unchanged_by_merge() {
        let mut state = loaded(&["a"]);
        let earlier = state.shared_items();

        state.apply_created(item("b"));

        assert_eq!(earlier.len(), 1);
        assert_eq!(state.len(), 2);
    }

    fn id_strategy() -> impl Strategy<Value = String> {
        prop_oneof![Just("a"), Just("b"), Just("c"), Just("d"), Just("e"), Just("f")]
            .prop_map(String::from)
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

        #[test]
        fn merges_never_duplicate_ids(
            page in proptest::collection::vec(id_strategy(), 0..6),
            created in proptest::collection::vec(id_strategy(), 0..20),
        ) {
            let page: Vec<&str> = page.iter().map(String::as_str).collect();
            let mut state = loaded(&page);
            for id in &created {
                state.apply_created(item(id));
            }

            let mut seen = HashSet::new();
            for cached in state.items() {
                prop_assert!(seen.insert(cached.id.clone()));
            }
            prop_assert_eq!(seen.len(), state.ids.len());
        }

        #[test]
        fn repeated_merge_is_noop(
            page in proptest::collection::vec(id_strategy(), 0..6),
            id in id_strategy(),
        ) {
            let page: Vec<&str> = page.iter().map(String::as_str).collect();
            let mut state = loaded(&page);
            state.apply_created(item(&id));
            let once = state.snapshot();

            prop_assert_eq!(state.apply_created(item(&id)), MergeOutcome::Duplicate);
            prop_assert_eq!(state.snapshot(), once);
        }

        #[test]
        fn existing_items_keep_relative_order(
            page in proptest::collection::vec(id_strategy(), 0..6),
            created in proptest::collection::vec(id_strategy(), 0..10),
        ) {
            let page: Vec<&str> = page.iter().map(String::as_str).collect();
            let mut state = loaded(&page);
            let before = state.snapshot().ids();
            for id in &created {
                state.apply_created(item(id));
            }

            let after: Vec<_> = state
                .snapshot()
                .ids()
                .into_iter()
                .filter(|id| before.contains(id))
                .collect();
            prop_assert_eq!(after, before);
        }
    }
}
