//! # Backend Adapters
//!
//! Port implementations the subsystems are wired to.
//!
//! - `memory` - In-process backend for development and tests

pub mod memory;

pub use memory::InMemoryBackend;
