//! Domain Layer - Pure cache logic
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod merge;
pub mod state;

pub use merge::MergeOutcome;
pub use state::{CacheSnapshot, CacheState};
