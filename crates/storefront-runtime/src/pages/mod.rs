//! # Pages
//!
//! Page lifecycles that own subsystem instances for as long as they are
//! mounted.

pub mod market_list;

pub use market_list::{MarketListPage, MarketListView};
