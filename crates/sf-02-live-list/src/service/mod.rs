//! Service Layer - Cache orchestration

pub mod cache;

pub use cache::LiveListCache;
