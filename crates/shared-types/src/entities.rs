//! # Core Domain Entities
//!
//! Defines the storefront entities that cross subsystem boundaries.
//!
//! ## Clusters
//!
//! - **Identity**: `SubjectId`, `Session`, `UserRecord`
//! - **Listing**: `ItemId`, `ListItem`, `NewListItem`
//! - **Pagination**: `PageToken`, `Page`, `ListFilter`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Stable identifier for an authenticated identity.
///
/// This is the provisioning key: at most one `UserRecord` exists per subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(pub String);

impl SubjectId {
    /// Create a subject id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved identity-provider session.
///
/// Absence of a session (`Option::None`) is the unauthenticated state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Subject the session belongs to.
    pub subject_id: SubjectId,
    /// Username shown in the navigation bar and used as market owner.
    pub display_name: String,
    /// Contact email from the identity provider attributes.
    pub email: String,
    /// Always `true` for sessions produced by the identity provider.
    pub is_authenticated: bool,
}

impl Session {
    /// Create an authenticated session.
    pub fn new(
        subject_id: SubjectId,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            subject_id,
            display_name: display_name.into(),
            email: email.into(),
            is_authenticated: true,
        }
    }
}

/// A provisioned user account in the identity store.
///
/// Created lazily on first successful sign-in; never updated or deleted
/// by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique key.
    pub subject_id: SubjectId,
    /// Username copied from the session at provisioning time.
    pub username: String,
    /// Email copied from the session at provisioning time.
    pub email: String,
    /// Marks the record as created through sign-in provisioning.
    pub registered: bool,
}

impl UserRecord {
    /// Build the record a session should be provisioned with.
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self {
            subject_id: session.subject_id.clone(),
            username: session.display_name.clone(),
            email: session.email.clone(),
            registered: true,
        }
    }
}

// =============================================================================
// CLUSTER B: LISTING
// =============================================================================

/// Unique identifier of a list item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create an item id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A market as shown in the storefront list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Unique key within a cache.
    pub id: ItemId,
    /// Market name.
    pub name: String,
    /// Number of products in the market.
    pub child_count: usize,
    /// Market tags.
    pub tags: BTreeSet<String>,
    /// Username of the market owner.
    pub owner: String,
    /// Server-side creation time.
    pub created_at: DateTime<Utc>,
}

impl ListItem {
    /// Create an item with no products and no tags.
    pub fn new(id: ItemId, name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            child_count: 0,
            tags: BTreeSet::new(),
            owner: owner.into(),
            created_at: Utc::now(),
        }
    }

    /// Builder-style tag assignment.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style product count assignment.
    #[must_use]
    pub fn with_child_count(mut self, child_count: usize) -> Self {
        self.child_count = child_count;
        self
    }
}

/// Input for creating a new list item.
///
/// The backend assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListItem {
    /// Market name (must be non-empty after trimming).
    pub name: String,
    /// Selected tags.
    pub tags: BTreeSet<String>,
    /// Owner username.
    pub owner: String,
}

// =============================================================================
// CLUSTER C: PAGINATION
// =============================================================================

/// Opaque continuation token returned by paginated queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageToken(pub String);

/// One page of a paginated query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in server order.
    pub items: Vec<T>,
    /// Token for the next page, absent on the last page.
    pub next_page_token: Option<PageToken>,
}

impl<T> Page<T> {
    /// A page with no items and no continuation.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_page_token: None,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Server-side filter for list queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    /// Only items owned by this username.
    pub owner: Option<String>,
    /// Only items carrying this tag.
    pub tag: Option<String>,
    /// Maximum page size.
    pub limit: Option<usize>,
}

impl ListFilter {
    /// Check whether an item passes this filter.
    #[must_use]
    pub fn matches(&self, item: &ListItem) -> bool {
        let owner_match = self.owner.as_ref().map_or(true, |o| &item.owner == o);
        let tag_match = self.tag.as_ref().map_or(true, |t| item.tags.contains(t));
        owner_match && tag_match
    }
}
