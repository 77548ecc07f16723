//! Invalidation events.
//!
//! Uses `tokio::sync::broadcast` so async consumers (refetch tasks, UI
//! bridges) can follow invalidations without registering a listener.

use serde::Serialize;
use tokio::sync::broadcast;

/// Why a region was invalidated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvalidationCause {
    /// A write to the region itself succeeded.
    Write,
    /// The region's data was fetched again.
    Refetch,
    /// A region this one depends on was invalidated.
    Dependency { source: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidationEvent {
    pub region: String,
    pub cause: InvalidationCause,
}

impl InvalidationEvent {
    pub fn new(region: impl Into<String>, cause: InvalidationCause) -> Self {
        Self {
            region: region.into(),
            cause,
        }
    }
}

/// Broadcast channel of invalidation events.
pub struct InvalidationBus {
    sender: broadcast::Sender<InvalidationEvent>,
}

impl InvalidationBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Receive every published invalidation.
    pub fn subscribe(&self) -> broadcast::Receiver<InvalidationEvent> {
        self.sender.subscribe()
    }

    /// Publish to all current subscribers. Without subscribers the event is dropped.
    pub fn publish(&self, event: InvalidationEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InvalidationBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bus_fans_out() {
        let bus = InvalidationBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.clone().subscribe();

        bus.publish(InvalidationEvent::new("reviews", InvalidationCause::Write));

        assert_eq!(first.recv().await.unwrap().region, "reviews");
        assert_eq!(second.recv().await.unwrap().region, "reviews");
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = InvalidationBus::default();
        bus.publish(InvalidationEvent::new("reviews", InvalidationCause::Refetch));
    }
}
