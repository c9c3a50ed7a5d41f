//! # Event Stream
//!
//! Listener side of the hub: a filtered stream of capsules.
//!
//! A broadcast receiver that falls more than the channel capacity behind
//! loses the oldest capsules. The stream keeps going, but counts what was
//! skipped so the listener can resynchronize from the source of truth.

use crate::events::{EventFilter, HubCapsule};
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

/// Capsules matching a filter, in publish order.
///
/// Dropping the stream releases the subscription.
pub struct EventStream {
    inner: BroadcastStream<HubCapsule>,
    filter: EventFilter,
    lagged: u64,
}

impl EventStream {
    pub(crate) fn new(receiver: broadcast::Receiver<HubCapsule>, filter: EventFilter) -> Self {
        Self {
            inner: BroadcastStream::new(receiver),
            filter,
            lagged: 0,
        }
    }

    /// Get the filter for this stream.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Capsules skipped since the last call, resetting the count.
    pub fn take_lagged(&mut self) -> u64 {
        std::mem::take(&mut self.lagged)
    }
}

impl Stream for EventStream {
    type Item = HubCapsule;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(capsule))) => {
                    if self.filter.matches(&capsule) {
                        return Poll::Ready(Some(capsule));
                    }
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(count)))) => {
                    warn!(
                        channels = ?self.filter.channels,
                        lagged = count,
                        "Listener lagged, capsules dropped"
                    );
                    self.lagged += count;
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
