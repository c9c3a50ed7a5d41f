//! Domain Layer - Pure session logic
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod provisioning;
pub mod state;

pub use provisioning::{classify_create, classify_lookup, ProvisioningOutcome};
pub use state::{EventOutcome, SessionSnapshot, SessionState};
