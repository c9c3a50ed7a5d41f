//! # Hub Events
//!
//! Defines the raw capsule that flows through the bus and the typed view of
//! authentication lifecycle notifications.

use crate::AUTH_CHANNEL;
use serde::{Deserialize, Serialize};

/// A notification published on the hub.
///
/// `payload` is whatever the publisher attached; for auth events it is the
/// identity-provider session payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubCapsule {
    /// Channel the capsule was published on.
    pub channel: String,
    /// Event name (e.g. `signIn`).
    pub name: String,
    /// Publisher-defined data.
    pub payload: serde_json::Value,
}

impl HubCapsule {
    /// Create a capsule on an arbitrary channel.
    pub fn new(
        channel: impl Into<String>,
        name: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            channel: channel.into(),
            name: name.into(),
            payload,
        }
    }

    /// Create a capsule on the auth channel.
    pub fn auth(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::new(AUTH_CHANNEL, name, payload)
    }

    /// Create an auth capsule from a typed event.
    #[must_use]
    pub fn from_auth_event(event: &AuthEvent) -> Self {
        match event {
            AuthEvent::SignIn(payload) => Self::auth("signIn", payload.clone()),
            AuthEvent::SignUp(payload) => Self::auth("signUp", payload.clone()),
            AuthEvent::SignOut => Self::auth("signOut", serde_json::Value::Null),
            AuthEvent::Unknown(name) => Self::auth(name.clone(), serde_json::Value::Null),
        }
    }

    /// Event name as the identity provider reported it.
    ///
    /// Providers that nest the name inside the payload (`{"event": "signIn"}`)
    /// take precedence over the capsule name.
    #[must_use]
    pub fn event_name(&self) -> &str {
        self.payload
            .get("event")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(&self.name)
    }
}

/// Authentication lifecycle events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AuthEvent {
    /// A user signed in. Carries the identity-provider session payload.
    SignIn(serde_json::Value),

    /// A user signed up. Informational only.
    SignUp(serde_json::Value),

    /// The user signed out.
    SignOut,

    /// Any other event name. Ignored by listeners.
    Unknown(String),
}

impl AuthEvent {
    /// Decode a capsule into a typed auth event.
    ///
    /// Returns `None` for capsules on other channels.
    #[must_use]
    pub fn from_capsule(capsule: &HubCapsule) -> Option<Self> {
        if capsule.channel != AUTH_CHANNEL {
            return None;
        }
        let event = match capsule.event_name() {
            "signIn" => Self::SignIn(capsule.payload.clone()),
            "signUp" => Self::SignUp(capsule.payload.clone()),
            "signOut" => Self::SignOut,
            other => Self::Unknown(other.to_string()),
        };
        Some(event)
    }

    /// Short label used in logs and metrics.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::SignIn(_) => "signIn",
            Self::SignUp(_) => "signUp",
            Self::SignOut => "signOut",
            Self::Unknown(name) => name,
        }
    }
}

/// Filter for subscribing to specific channels.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Channels to include. Empty means all channels.
    pub channels: Vec<String>,
}

impl EventFilter {
    /// Create a filter that accepts all capsules.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for a single channel.
    pub fn channel(channel: impl Into<String>) -> Self {
        Self {
            channels: vec![channel.into()],
        }
    }

    /// Create a filter for the auth channel.
    #[must_use]
    pub fn auth() -> Self {
        Self::channel(AUTH_CHANNEL)
    }

    /// Check if a capsule matches this filter.
    #[must_use]
    pub fn matches(&self, capsule: &HubCapsule) -> bool {
        self.channels.is_empty() || self.channels.iter().any(|c| c == &capsule.channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_known_names() {
        let sign_in = HubCapsule::auth("signIn", json!({"username": "alice"}));
        assert_eq!(
            AuthEvent::from_capsule(&sign_in),
            Some(AuthEvent::SignIn(json!({"username": "alice"})))
        );

        let sign_up = HubCapsule::auth("signUp", json!({}));
        assert!(matches!(
            AuthEvent::from_capsule(&sign_up),
            Some(AuthEvent::SignUp(_))
        ));

        let sign_out = HubCapsule::auth("signOut", serde_json::Value::Null);
        assert_eq!(AuthEvent::from_capsule(&sign_out), Some(AuthEvent::SignOut));
    }

    #[test]
    fn test_decode_unknown_name() {
        let capsule = HubCapsule::auth("tokenRefresh", serde_json::Value::Null);
        assert_eq!(
            AuthEvent::from_capsule(&capsule),
            Some(AuthEvent::Unknown("tokenRefresh".into()))
        );
    }

    #[test]
    fn test_payload_event_name_wins() {
        let capsule = HubCapsule::auth("auth", json!({"event": "signOut"}));
        assert_eq!(AuthEvent::from_capsule(&capsule), Some(AuthEvent::SignOut));
    }

    #[test]
    fn test_other_channel_not_decoded() {
        let capsule = HubCapsule::new("storage", "signIn", serde_json::Value::Null);
        assert_eq!(AuthEvent::from_capsule(&capsule), None);
    }

    #[test]
    fn test_round_trip_through_capsule() {
        let event = AuthEvent::SignIn(json!({"username": "bob"}));
        let capsule = HubCapsule::from_auth_event(&event);
        assert_eq!(capsule.channel, AUTH_CHANNEL);
        assert_eq!(AuthEvent::from_capsule(&capsule), Some(event));
    }

    #[test]
    fn test_filter_by_channel() {
        let filter = EventFilter::auth();
        assert!(filter.matches(&HubCapsule::auth("signIn", json!({}))));
        assert!(!filter.matches(&HubCapsule::new("storage", "put", json!({}))));
        assert!(EventFilter::all().matches(&HubCapsule::new("storage", "put", json!({}))));
    }
}
