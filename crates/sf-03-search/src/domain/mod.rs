//! Domain Layer - Pure filtering
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod display;
pub mod query;
pub mod tags;

pub use display::{display_items, Display, DisplayMode};
pub use query::{filter, SearchQuery};
pub use tags::filter_tag_options;
