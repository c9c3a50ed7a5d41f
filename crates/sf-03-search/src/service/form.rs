//! Search form state backing the market list header.

use shared_types::ListItem;
use storefront_telemetry::SEARCH_QUERIES;
use tracing::debug;

use crate::domain::{display_items, Display, SearchQuery};
use crate::SUBSYSTEM;

/// Search term, last results and in-progress flag.
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    term: String,
    results: Vec<ListItem>,
    is_searching: bool,
}

impl SearchForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Results of the last run.
    #[must_use]
    pub fn results(&self) -> &[ListItem] {
        &self.results
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    /// Update the term without searching.
    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    /// Mark a search as started and return the query for the current term.
    pub fn begin(&mut self) -> SearchQuery {
        self.is_searching = true;
        SearchQuery::new(&self.term)
    }

    /// Store the results of a search started with [`SearchForm::begin`].
    pub fn complete(&mut self, results: Vec<ListItem>) -> usize {
        self.results = results;
        self.is_searching = false;

        let outcome = if self.results.is_empty() { "empty" } else { "hits" };
        SEARCH_QUERIES.with_label_values(&[outcome]).inc();
        self.results.len()
    }

    /// Search `items` for the current term. Returns the number of results.
    pub fn run(&mut self, items: &[ListItem]) -> usize {
        let query = self.begin();
        let found = self.complete(query.apply(items));
        debug!(
            subsystem = SUBSYSTEM,
            term = %query.as_str(),
            scanned = items.len(),
            results = found,
            "Search executed"
        );
        found
    }

    /// Reset the term and results.
    pub fn clear(&mut self) {
        self.term.clear();
        self.results.clear();
        self.is_searching = false;
    }

    /// What the list should show given the cached `items`.
    #[must_use]
    pub fn display<'a>(&'a self, items: &'a [ListItem]) -> Display<'a> {
        display_items(items, &self.results)
    }
}
