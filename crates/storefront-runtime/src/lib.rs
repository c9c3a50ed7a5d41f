//! # Storefront Runtime Library
//!
//! This library exposes the runtime modules for testing. The main entry
//! point is the `main.rs` binary.
//!
//! ## Architectural Patterns
//!
//! - **Event-Driven**: Session changes arrive as hub capsules only
//! - **Hexagonal Architecture**: Ports define contracts, adapters implement them
//! - **Explicit Context**: The session is passed to whatever needs it

pub mod adapters;
pub mod checkout;
pub mod container;
pub mod market;
pub mod pages;
pub mod runtime;

pub use container::{StorefrontConfig, StorefrontContainer};
pub use runtime::StorefrontRuntime;
