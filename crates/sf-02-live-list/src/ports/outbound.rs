//! Outbound Ports (Driven Ports)

use async_trait::async_trait;
use futures::stream::BoxStream;
use shared_types::{ListFilter, ListItem, NewListItem, Page, PageToken, RemoteError};
use std::sync::Arc;

/// Stream of items created anywhere in the system, in delivery order.
pub type CreatedStream = BoxStream<'static, ListItem>;

/// Remote list backend.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Fetch one page of items in server order.
    async fn query(
        &self,
        filter: Option<&ListFilter>,
        page_token: Option<&PageToken>,
    ) -> Result<Page<ListItem>, RemoteError>;

    /// Subscribe to creation notifications.
    ///
    /// Notifications published before this call are not delivered. Dropping
    /// the stream releases the subscription.
    fn subscribe_created(&self) -> CreatedStream;

    /// Create an item. Subscribers are notified of the stored item.
    async fn create(&self, draft: NewListItem) -> Result<ListItem, RemoteError>;
}

#[async_trait]
impl<T: ListStore + ?Sized> ListStore for Arc<T> {
    async fn query(
        &self,
        filter: Option<&ListFilter>,
        page_token: Option<&PageToken>,
    ) -> Result<Page<ListItem>, RemoteError> {
        (**self).query(filter, page_token).await
    }

    fn subscribe_created(&self) -> CreatedStream {
        (**self).subscribe_created()
    }

    async fn create(&self, draft: NewListItem) -> Result<ListItem, RemoteError> {
        (**self).create(draft).await
    }
}
