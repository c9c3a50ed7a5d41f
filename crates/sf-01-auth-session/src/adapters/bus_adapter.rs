//! Event Bus Adapter for the Auth Session subsystem
//!
//! Listens on the hub's auth channel, decodes each capsule into an
//! [`AuthEvent`] and hands it to the controller in delivery order.

use futures::StreamExt;
use shared_bus::{AuthEvent, EventFilter, EventStream, HubCapsule, InMemoryEventBus};
use storefront_telemetry::{metric_inc, EVENT_BUS_MESSAGES_RECEIVED};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::EventOutcome;
use crate::ports::AuthSessionApi;
use crate::SUBSYSTEM;

/// Hub listener for auth events.
///
/// The subscription is taken in [`AuthBusAdapter::new`], so events published
/// between construction and [`AuthBusAdapter::run`] are not lost.
pub struct AuthBusAdapter<A> {
    api: A,
    stream: EventStream,
}

impl<A: AuthSessionApi> AuthBusAdapter<A> {
    /// Subscribe to the auth channel of `bus`.
    pub fn new(bus: &InMemoryEventBus, api: A) -> Self {
        Self {
            api,
            stream: bus.event_stream(EventFilter::auth()),
        }
    }

    /// Process events until the bus closes or `shutdown` flips to `true`.
    ///
    /// Events are handled one at a time; a `signOut` can never overtake an
    /// earlier `signIn`.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(subsystem = SUBSYSTEM, "Auth listener started");

        loop {
            tokio::select! {
                next = self.stream.next() => match next {
                    Some(capsule) => {
                        self.resync_if_lagged().await;
                        self.handle_capsule(&capsule).await;
                    }
                    None => {
                        warn!(subsystem = SUBSYSTEM, "Hub closed, auth listener stopping");
                        break;
                    }
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!(subsystem = SUBSYSTEM, "Auth listener shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Re-resolve the session if capsules were skipped.
    ///
    /// A dropped `signOut` would otherwise leave the session authenticated.
    async fn resync_if_lagged(&mut self) {
        let skipped = self.stream.take_lagged();
        if skipped == 0 {
            return;
        }
        warn!(
            subsystem = SUBSYSTEM,
            skipped, "Auth events lost, re-resolving session"
        );
        self.api.start().await;
    }

    /// Decode and dispatch a single capsule.
    ///
    /// Returns `None` when the capsule is not an auth event or handling it
    /// failed; failures are logged and never stop the listener.
    pub async fn handle_capsule(&self, capsule: &HubCapsule) -> Option<EventOutcome> {
        let event = AuthEvent::from_capsule(capsule)?;
        metric_inc!(
            EVENT_BUS_MESSAGES_RECEIVED,
            &[capsule.channel.as_str(), metric_name(&event)]
        );
        debug!(subsystem = SUBSYSTEM, event = %event.label(), "Auth event received");

        match self.api.handle_event(event).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(subsystem = SUBSYSTEM, error = %e, "Auth event not applied");
                None
            }
        }
    }

    /// The controller this adapter feeds.
    pub fn api(&self) -> &A {
        &self.api
    }
}

fn metric_name(event: &AuthEvent) -> &'static str {
    match event {
        AuthEvent::SignIn(_) => "signIn",
        AuthEvent::SignUp(_) => "signUp",
        AuthEvent::SignOut => "signOut",
        AuthEvent::Unknown(_) => "other",
    }
}
