//! Adapters Layer
//!
//! - `live_feed` - Pumps a creation stream into a cache

pub mod live_feed;

pub use live_feed::LiveFeed;
