//! # Shared Bus - Hub Event Delivery
//!
//! Delivers named lifecycle notifications from the identity provider to
//! registered listeners.
//!
//! ## Channels
//!
//! Every notification is a `HubCapsule` published on a named channel.
//! Authentication lifecycle events travel on [`AUTH_CHANNEL`] and decode
//! into the [`AuthEvent`] sum type so listeners dispatch through a single
//! `match` instead of comparing strings.
//!
//! ```text
//! ┌───────────────────┐                    ┌──────────────────────┐
//! │ Identity Provider │    publish()       │ Session Controller   │
//! │                   │ ──────┐            │                      │
//! └───────────────────┘       │            └──────────────────────┘
//!                             ▼                    ↑
//!                       ┌──────────────┐          │
//!                       │  Hub Bus     │          │
//!                       │              │ ─────────┘
//!                       └──────────────┘  subscribe("auth")
//! ```
//!
//! ## Delivery Guarantees
//!
//! - Events are delivered in publish order to each subscriber.
//! - Delivery is at-least-once from the listener's point of view; listeners
//!   must tolerate repeated events.
//! - Delivery never waits for work a listener started for an earlier event.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{AuthEvent, EventFilter, HubCapsule};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::EventStream;

/// Channel carrying identity-provider lifecycle notifications.
pub const AUTH_CHANNEL: &str = "auth";

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
