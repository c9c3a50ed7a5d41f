//! Search predicate and filter.

use shared_types::ListItem;

/// Return the items satisfying `predicate`, in their original order.
pub fn filter<P>(items: &[ListItem], predicate: P) -> Vec<ListItem>
where
    P: Fn(&ListItem) -> bool,
{
    items.iter().filter(|item| predicate(item)).cloned().collect()
}

/// Case-insensitive substring search over item names and tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.trim().to_lowercase(),
        }
    }

    /// Whether the query has no searchable text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Normalized search text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.needle
    }

    /// Whether `item` matches. An empty query matches nothing.
    #[must_use]
    pub fn matches(&self, item: &ListItem) -> bool {
        if self.is_empty() {
            return false;
        }
        item.name.to_lowercase().contains(&self.needle)
            || item
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&self.needle))
    }

    /// Items matching this query, in their original order.
    #[must_use]
    pub fn apply(&self, items: &[ListItem]) -> Vec<ListItem> {
        filter(items, |item| self.matches(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::ItemId;

    fn market(id: &str, name: &str, tags: &[&str]) -> ListItem {
        ListItem::new(ItemId::new(id), name, "alice").with_tags(tags.iter().copied())
    }

    fn markets() -> Vec<ListItem> {
        vec![
            market("1", "Pottery Corner", &["Crafts", "Arts"]),
            market("2", "Rust Books", &["Technology"]),
            market("3", "Stage Lights", &["Entertainment"]),
        ]
    }

    #[test]
    fn test_matches_name_case_insensitively() {
        let results = SearchQuery::new("  pOTTERY ").apply(&markets());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, ItemId::new("1"));
    }

    #[test]
    fn test_matches_tags() {
        let results = SearchQuery::new("tech").apply(&markets());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Rust Books");
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        assert!(SearchQuery::new("   ").is_empty());
        assert!(SearchQuery::new("").apply(&markets()).is_empty());
    }

    #[test]
    fn test_filter_keeps_order() {
        let results = filter(&markets(), |item| item.id != ItemId::new("2"));
        let ids: Vec<_> = results.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    fn item_strategy() -> impl Strategy<Value = ListItem> {
        let name = prop_oneof![Just("Arts Hub"), Just("Web Shop"), Just("Crafty"), Just("Tech")];
        (0u32..1000, name, any::<bool>()).prop_map(|(id, name, tagged)| {
            let item = ListItem::new(ItemId::new(id.to_string()), name, "bob");
            if tagged {
                item.with_tags(["Crafts"])
            } else {
                item
            }
        })
    }

    proptest! {
        #[test]
        fn filter_returns_ordered_matching_subsequence(
            items in proptest::collection::vec(item_strategy(), 0..16),
            term in prop_oneof![Just("art"), Just("craft"), Just("web"), Just("x")],
        ) {
            let query = SearchQuery::new(term);
            let results = query.apply(&items);

            for result in &results {
                prop_assert!(query.matches(result));
            }

            // Results appear in `items` in the same order.
            let mut cursor = items.iter();
            for result in &results {
                prop_assert!(cursor.any(|item| item == result));
            }

            let expected = items.iter().filter(|item| query.matches(item)).count();
            prop_assert_eq!(results.len(), expected);
        }
    }
}
