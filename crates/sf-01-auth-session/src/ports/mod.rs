//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API the application and hub listener call
//! - Driven Ports (outbound) - Identity provider and identity store

pub mod inbound;
pub mod outbound;

pub use inbound::AuthSessionApi;
pub use outbound::{IdentityProvider, IdentityStore};
