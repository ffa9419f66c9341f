//! Change notification feed
//!
//! Every successful write publishes a `ChangeEvent`. Subscribers use events
//! only as a signal to re-fetch a snapshot; a subscriber that lags behind
//! skips the events it missed.

use shared::{ChangeEvent, ChangeKind, Collection};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Broadcast handle shared by all services
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish a change; having no subscribers is not an error
    pub fn publish(&self, collection: Collection, kind: ChangeKind, id: Uuid) {
        let event = ChangeEvent::new(collection, kind, id);
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!(%collection, ?kind, %id, receivers, "Published change");
            }
            Err(_) => {
                tracing::trace!(%collection, ?kind, %id, "No change subscribers");
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Wait for the next event, skipping over any that were missed.
    /// Returns `None` once the feed is closed.
    pub async fn next_event(receiver: &mut broadcast::Receiver<ChangeEvent>) -> Option<ChangeEvent> {
        loop {
            match receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Change subscriber lagged; skipping to latest");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let feed = ChangeFeed::new(8);
        let mut rx = feed.subscribe();
        let id = Uuid::new_v4();

        feed.publish(Collection::Sales, ChangeKind::Insert, id);

        let event = ChangeFeed::next_event(&mut rx).await.unwrap();
        assert_eq!(event.collection, Collection::Sales);
        assert_eq!(event.kind, ChangeKind::Insert);
        assert_eq!(event.id, id);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let feed = ChangeFeed::new(8);
        assert_eq!(feed.subscriber_count(), 0);
        feed.publish(Collection::Stock, ChangeKind::Delete, Uuid::new_v4());
    }

    #[tokio::test]
    async fn test_lagged_subscriber_skips_to_latest() {
        let feed = ChangeFeed::new(2);
        let mut rx = feed.subscribe();
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            feed.publish(Collection::Sales, ChangeKind::Update, *id);
        }

        let first = ChangeFeed::next_event(&mut rx).await.unwrap();
        assert_eq!(first.id, ids[3]);
        let second = ChangeFeed::next_event(&mut rx).await.unwrap();
        assert_eq!(second.id, ids[4]);
    }

    #[tokio::test]
    async fn test_closed_feed_ends_stream() {
        let feed = ChangeFeed::new(2);
        let mut rx = feed.subscribe();
        drop(feed);
        assert!(ChangeFeed::next_event(&mut rx).await.is_none());
    }
}
