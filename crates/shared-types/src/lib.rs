//! # Shared Types Crate
//!
//! This crate contains the domain entities and remote error taxonomy shared
//! by every storefront subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Opaque Services**: Remote stores are consumed through ports; this crate
//!   only describes what crosses those ports, never how it travels.
//! - **Explicit Context**: A `Session` is passed as a parameter to anything
//!   that needs it. There is no ambient "current user".

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
