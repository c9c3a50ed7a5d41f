//! # In-Memory Backend
//!
//! Development stand-in for the managed backend. Implements every driven
//! port the storefront needs:
//!
//! | Port | Behavior |
//! |------|----------|
//! | `IdentityProvider` | Current session set by `sign_in`; lifecycle events published on the hub |
//! | `IdentityStore` | Subject ids unique; `create` fails with `DuplicateKey` on collision |
//! | `ListStore` | Insertion order, offset page tokens, creations broadcast to subscribers |
//! | `PaymentGateway` | Records accepted charges |

use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use parking_lot::RwLock;
use serde_json::json;
use shared_bus::{AuthEvent, EventPublisher, InMemoryEventBus};
use shared_types::{
    ItemId, ListFilter, ListItem, NewListItem, Page, PageToken, RemoteError, Session, SubjectId,
    UserRecord,
};
use sf_01_auth_session::{IdentityProvider, IdentityStore};
use sf_02_live_list::{CreatedStream, ListStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

use crate::checkout::{ChargeReceipt, ChargeRequest, PaymentGateway};

/// Page size used when a query carries no limit.
const DEFAULT_PAGE_SIZE: usize = 20;

/// Creation notifications buffered per subscriber.
const CREATED_CHANNEL_CAPACITY: usize = 64;

/// In-process backend.
pub struct InMemoryBackend {
    hub: Arc<InMemoryEventBus>,
    current: RwLock<Option<Session>>,
    users: RwLock<HashMap<SubjectId, UserRecord>>,
    markets: RwLock<Vec<ListItem>>,
    created_tx: broadcast::Sender<ListItem>,
    charges: RwLock<Vec<ChargeRequest>>,
}

impl InMemoryBackend {
    /// Create a backend publishing auth lifecycle events on `hub`.
    pub fn new(hub: Arc<InMemoryEventBus>) -> Self {
        let (created_tx, _) = broadcast::channel(CREATED_CHANNEL_CAPACITY);
        Self {
            hub,
            current: RwLock::new(None),
            users: RwLock::new(HashMap::new()),
            markets: RwLock::new(Vec::new()),
            created_tx,
            charges: RwLock::new(Vec::new()),
        }
    }

    /// Sign `session` in and announce it on the hub.
    pub async fn sign_in(&self, session: Session) {
        let payload = session_payload(&session);
        *self.current.write() = Some(session);
        self.hub.publish_auth(AuthEvent::SignIn(payload)).await;
    }

    /// Register a new identity and announce it on the hub.
    pub async fn sign_up(&self, session: &Session) {
        self.hub
            .publish_auth(AuthEvent::SignUp(session_payload(session)))
            .await;
    }

    /// Seed markets without notifying creation subscribers.
    pub fn seed_markets(&self, items: impl IntoIterator<Item = ListItem>) {
        self.markets.write().extend(items);
    }

    /// Number of stored user records.
    pub fn user_count(&self) -> usize {
        self.users.read().len()
    }

    /// Charges accepted so far.
    pub fn charges(&self) -> Vec<ChargeRequest> {
        self.charges.read().clone()
    }
}

fn session_payload(session: &Session) -> serde_json::Value {
    json!({
        "username": session.display_name,
        "attributes": {
            "sub": session.subject_id.as_str(),
            "email": session.email,
        },
    })
}

#[async_trait]
impl IdentityProvider for InMemoryBackend {
    async fn resolve_current_session(&self) -> Result<Option<Session>, RemoteError> {
        Ok(self.current.read().clone())
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        *self.current.write() = None;
        self.hub.publish_auth(AuthEvent::SignOut).await;
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for InMemoryBackend {
    async fn find(&self, subject_id: &SubjectId) -> Result<Option<UserRecord>, RemoteError> {
        Ok(self.users.read().get(subject_id).cloned())
    }

    async fn create(&self, record: UserRecord) -> Result<UserRecord, RemoteError> {
        let mut users = self.users.write();
        if users.contains_key(&record.subject_id) {
            return Err(RemoteError::DuplicateKey {
                key: record.subject_id.to_string(),
            });
        }
        users.insert(record.subject_id.clone(), record.clone());
        Ok(record)
    }
}

#[async_trait]
impl ListStore for InMemoryBackend {
    async fn query(
        &self,
        filter: Option<&ListFilter>,
        page_token: Option<&PageToken>,
    ) -> Result<Page<ListItem>, RemoteError> {
        let offset = match page_token {
            Some(token) => token
                .0
                .parse::<usize>()
                .map_err(|_| RemoteError::Rejected(format!("invalid page token {:?}", token.0)))?,
            None => 0,
        };
        let limit = filter
            .and_then(|f| f.limit)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .max(1);

        let markets = self.markets.read();
        let matching: Vec<&ListItem> = markets
            .iter()
            .filter(|item| filter.map_or(true, |f| f.matches(item)))
            .collect();

        let items: Vec<ListItem> = matching
            .iter()
            .skip(offset)
            .take(limit)
            .map(|item| (*item).clone())
            .collect();
        let end = offset + items.len();
        let next_page_token = (end < matching.len()).then(|| PageToken(end.to_string()));

        Ok(Page {
            items,
            next_page_token,
        })
    }

    fn subscribe_created(&self) -> CreatedStream {
        BroadcastStream::new(self.created_tx.subscribe())
            .filter_map(|next| async move {
                match next {
                    Ok(item) => Some(item),
                    Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                        warn!(skipped, "Creation listener lagged, live items dropped");
                        None
                    }
                }
            })
            .boxed()
    }

    async fn create(&self, draft: NewListItem) -> Result<ListItem, RemoteError> {
        let item = ListItem {
            id: ItemId::generate(),
            name: draft.name,
            child_count: 0,
            tags: draft.tags,
            owner: draft.owner,
            created_at: Utc::now(),
        };
        self.markets.write().push(item.clone());

        let receivers = self.created_tx.send(item.clone()).unwrap_or(0);
        debug!(item_id = %item.id, receivers, "Creation broadcast");
        Ok(item)
    }
}

#[async_trait]
impl PaymentGateway for InMemoryBackend {
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeReceipt, RemoteError> {
        let receipt = ChargeReceipt {
            charge_id: format!("ch_{}", uuid::Uuid::new_v4().simple()),
            amount_cents: request.amount_cents,
        };
        self.charges.write().push(request);
        Ok(receipt)
    }
}
