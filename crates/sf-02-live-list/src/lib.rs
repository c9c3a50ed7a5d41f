//! # SF-02 Live List
//!
//! Read-through cache for the market list: one paginated fetch, kept current
//! by a live stream of creation notifications.
//!
//! ## Lifecycle
//!
//! ```text
//! mount ──→ LiveFeed::attach ──→ load() ──→ apply_created()* ──→ release + dispose
//!                 │                 │              ↑
//!                 └── CreatedStream ┴──────────────┘
//! ```
//!
//! The feed is attached before the fetch starts; items created while the
//! fetch is outstanding are kept and merged on top of the fetched page.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | No id appears twice | `domain/merge.rs` - `CacheState::apply_created()` id index |
//! | Existing items keep their relative order | `domain/merge.rs` - prepend only |
//! | Returned snapshots never change | `domain/state.rs` - copy-on-write `Arc<Vec<_>>` |
//! | At most one fetch in flight | `service/cache.rs` - `begin_fetch()` |
//! | Disposed caches take no merges or fetch results | `service/cache.rs` - `disposed` flag |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! adapters/live_feed.rs  - LiveFeed pump task
//! ports/inbound.rs       - LiveListApi trait
//! ports/outbound.rs      - ListStore trait, CreatedStream
//! service/cache.rs       - LiveListCache
//! domain/state.rs        - CacheState, CacheSnapshot
//! domain/merge.rs        - MergeOutcome, live creation merge
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::LiveFeed;
pub use domain::{CacheSnapshot, CacheState, MergeOutcome};
pub use error::CacheError;
pub use ports::{CreatedStream, ListStore, LiveListApi};
pub use service::LiveListCache;

/// Subsystem label used in logs and metrics.
pub const SUBSYSTEM: &str = "live-list";
