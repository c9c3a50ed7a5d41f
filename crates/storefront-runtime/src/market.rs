//! # Markets and Products
//!
//! Market creation and ownership checks. The session is always passed in
//! explicitly; nothing here reads an ambient "current user".

use serde::{Deserialize, Serialize};
use shared_types::{ItemId, ListItem, NewListItem, RemoteError, Session, SubjectId};
use sf_02_live_list::ListStore;
use std::collections::BTreeSet;
use storefront_telemetry::log_event;
use thiserror::Error;

const SUBSYSTEM: &str = "market";

/// Market creation form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketDraft {
    pub name: String,
    pub tags: BTreeSet<String>,
}

impl MarketDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Market creation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    #[error("Market name is required")]
    EmptyName,

    #[error("Failed to create market: {0}")]
    Remote(#[from] RemoteError),
}

/// Create a market owned by the signed-in user.
///
/// Live subscribers learn about the new market through the store's
/// creation stream, not through the return value.
pub async fn create_market<S>(
    store: &S,
    session: &Session,
    draft: MarketDraft,
) -> Result<ListItem, MarketError>
where
    S: ListStore + ?Sized,
{
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(MarketError::EmptyName);
    }

    let request = NewListItem {
        name: name.to_string(),
        tags: draft.tags,
        owner: session.display_name.clone(),
    };

    match store.create(request).await {
        Ok(market) => {
            log_event!(
                info,
                SUBSYSTEM,
                "Market created",
                item_id = %market.id,
                owner = %market.owner
            );
            Ok(market)
        }
        Err(e) => {
            log_event!(error, SUBSYSTEM, "Error adding new market", error = %e);
            Err(MarketError::Remote(e))
        }
    }
}

/// Whether the signed-in user owns `market`.
#[must_use]
pub fn is_market_owner(session: Option<&Session>, market: &ListItem) -> bool {
    session.is_some_and(|s| s.display_name == market.owner)
}

/// A product listed in a market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ItemId,
    pub market_id: ItemId,
    pub description: String,
    pub price_cents: u64,
    /// Shipped products need a shipping address at checkout.
    pub shipped: bool,
    pub owner: SubjectId,
}

/// Whether the signed-in user owns a product listed by `owner`.
#[must_use]
pub fn is_product_owner(session: Option<&Session>, owner: &SubjectId) -> bool {
    session.is_some_and(|s| &s.subject_id == owner)
}
