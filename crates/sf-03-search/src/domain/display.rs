//! Display policy: results override the list only when non-empty.

use shared_types::ListItem;

/// Which heading the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Showing this many search results.
    Results(usize),
    /// Showing the whole cache.
    All,
}

/// Items to render and the heading to render them under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Display<'a> {
    pub mode: DisplayMode,
    pub items: &'a [ListItem],
}

/// Pick what to display: `results` if there are any, otherwise `cache`.
#[must_use]
pub fn display_items<'a>(cache: &'a [ListItem], results: &'a [ListItem]) -> Display<'a> {
    if results.is_empty() {
        Display {
            mode: DisplayMode::All,
            items: cache,
        }
    } else {
        Display {
            mode: DisplayMode::Results(results.len()),
            items: results,
        }
    }
}
