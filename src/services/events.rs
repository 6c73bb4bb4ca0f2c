//! In-process publish/subscribe for catalog events.
//!
//! A thin wrapper over a tokio broadcast channel with an explicit lifecycle:
//! created at server start, handed to the GraphQL schema, shut down when the
//! server stops. Shutting down drops the sender, which ends every open
//! subscriber stream. Events are delivered only to receivers that exist at
//! publish time; there is no replay.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

/// Default number of events buffered per subscriber before it starts lagging
pub const DEFAULT_CAPACITY: usize = 256;

pub struct EventBus<T> {
    sender: Arc<RwLock<Option<broadcast::Sender<T>>>>,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> EventBus<T> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(RwLock::new(Some(sender))),
        }
    }

    /// Publish an event, returning how many subscribers received it.
    ///
    /// Publishing with no subscribers, or after shutdown, is not an error.
    pub fn publish(&self, event: T) -> usize {
        match self.sender.read().as_ref() {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        }
    }

    /// Register a new subscriber.
    ///
    /// After shutdown this returns a receiver that is already closed.
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        match self.sender.read().as_ref() {
            Some(sender) => sender.subscribe(),
            None => broadcast::channel(1).1,
        }
    }

    /// Number of live subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender
            .read()
            .as_ref()
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    /// Close the channel. Open subscriptions end once they drain.
    pub fn shutdown(&self) {
        if self.sender.write().take().is_some() {
            tracing::info!("Event bus shut down");
        }
    }
}

impl<T: Clone + Send + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use tokio::sync::broadcast::error::RecvError;

    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events_published_after_subscribing() {
        let bus = EventBus::<String>::new(8);
        assert_eq!(bus.publish("before".to_string()), 0);

        let mut rx = bus.subscribe();
        assert_eq!(bus.publish("after".to_string()), 1);

        assert_eq!(rx.recv().await.unwrap(), "after");
        assert_matches!(rx.try_recv(), Err(_));
    }

    #[tokio::test]
    async fn test_fan_out() {
        let bus = EventBus::<u32>::new(8);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        assert_eq!(bus.publish(7), 2);
        assert_eq!(a.recv().await.unwrap(), 7);
        assert_eq!(b.recv().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_shutdown_closes_subscribers() {
        let bus = EventBus::<u32>::new(8);
        let mut rx = bus.subscribe();
        let clone = bus.clone();

        clone.shutdown();
        assert_eq!(bus.publish(1), 0);
        assert_eq!(bus.receiver_count(), 0);
        assert_matches!(rx.recv().await, Err(RecvError::Closed));

        let mut late = bus.subscribe();
        assert_matches!(late.recv().await, Err(RecvError::Closed));
    }
}
