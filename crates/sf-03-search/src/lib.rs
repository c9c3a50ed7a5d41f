//! # SF-03 Search
//!
//! Pure projection over cached list items. Nothing here mutates a cache.
//!
//! ## Display Policy
//!
//! | Search results | Shown | Heading |
//! |----------------|-------|---------|
//! | non-empty | the results | `DisplayMode::Results(n)` |
//! | empty | the full cache | `DisplayMode::All` |
//!
//! ## Module Structure
//!
//! ```text
//! domain/query.rs    - SearchQuery, filter()
//! domain/display.rs  - DisplayMode, display_items()
//! domain/tags.rs     - filter_tag_options()
//! service/form.rs    - SearchForm state
//! ```

pub mod domain;
pub mod service;

pub use domain::{display_items, filter, filter_tag_options, Display, DisplayMode, SearchQuery};
pub use service::SearchForm;

/// Subsystem label used in logs and metrics.
pub const SUBSYSTEM: &str = "search";
