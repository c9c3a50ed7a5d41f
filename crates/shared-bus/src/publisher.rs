//! # Event Publisher
//!
//! Publishing side of the hub and the in-process bus implementation.

use crate::events::{AuthEvent, EventFilter, HubCapsule};
use crate::subscriber::EventStream;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

/// Publishes capsules to every current listener.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a capsule. Returns how many listeners it reached.
    async fn publish(&self, capsule: HubCapsule) -> usize;

    /// Publish a typed auth event on the auth channel.
    async fn publish_auth(&self, event: AuthEvent) -> usize {
        self.publish(HubCapsule::from_auth_event(&event)).await
    }
}

/// In-process hub over `tokio::sync::broadcast`.
///
/// Each listener gets its own bounded buffer of `capacity` capsules.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<HubCapsule>,
}

impl InMemoryEventBus {
    /// Create a bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus buffering up to `capacity` capsules per listener.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Listen for capsules matching `filter` from now on.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        debug!(channels = ?filter.channels, "Listener subscribed");
        EventStream::new(self.sender.subscribe(), filter)
    }

    /// Number of live listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, capsule: HubCapsule) -> usize {
        let channel = capsule.channel.clone();
        let name = capsule.name.clone();

        // Sending only fails when nobody is listening.
        let receivers = self.sender.send(capsule).unwrap_or(0);
        debug!(channel = %channel, name = %name, receivers, "Capsule published");
        receivers
    }
}
