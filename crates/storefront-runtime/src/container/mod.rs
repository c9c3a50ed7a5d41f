//! # Storefront Container
//!
//! Holds the subsystem instances and the backend adapters they are wired to.

pub mod config;
pub mod services;

pub use config::{ConfigError, StorefrontConfig};
pub use services::{ConcreteAuthController, ConcreteMarketListPage, StorefrontContainer};
