//! Service Layer - Session orchestration

pub mod controller;

pub use controller::{AuthSessionController, ProvisioningHandle};
