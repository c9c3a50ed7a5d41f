//! # Storefront Test Suite
//!
//! Cross-subsystem flows exercised through the hub and the in-memory
//! backend, the same way the runtime wires them.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── auth_flows.rs    # Hub → session controller → identity store
//!     └── market_flows.rs  # List store → live cache → search overlay
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sf-tests
//! cargo test -p sf-tests integration::auth_flows
//! ```

pub mod integration;
